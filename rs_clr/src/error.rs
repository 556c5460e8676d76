use crate::host::HostingExport;
use crate::registry::MethodSignature;

// https://github.com/dotnet/runtime/blob/main/src/native/corehost/error_codes.h
#[repr(u32)]
#[allow(non_camel_case_types)]
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    // Success
    Success                             = 0,
    Success_HostAlreadyInitialized      = 0x00000001,
    Success_DifferentRuntimeProperties  = 0x00000002,

    // Failure
    InvalidArgFailure                   = 0x80008081,
    CoreHostLibLoadFailure              = 0x80008082,
    CoreHostLibMissingFailure           = 0x80008083,
    CoreHostEntryPointFailure           = 0x80008084,
    CoreHostCurHostFindFailure          = 0x80008085,
    CoreClrResolveFailure               = 0x80008087,
    CoreClrBindFailure                  = 0x80008088,
    CoreClrInitFailure                  = 0x80008089,
    CoreClrExeFailure                   = 0x8000808a,
    ResolverInitFailure                 = 0x8000808b,
    ResolverResolveFailure              = 0x8000808c,
    LibHostCurExeFindFailure            = 0x8000808d,
    LibHostInitFailure                  = 0x8000808e,
    LibHostExecModeFailure              = 0x80008090,
    LibHostSdkFindFailure               = 0x80008091,
    LibHostInvalidArgs                  = 0x80008092,
    InvalidConfigFile                   = 0x80008093,
    AppArgNotRunnable                   = 0x80008094,
    AppHostExeNotBoundFailure           = 0x80008095,
    FrameworkMissingFailure             = 0x80008096,
    HostApiFailed                       = 0x80008097,
    HostApiBufferTooSmall               = 0x80008098,
    LibHostUnknownCommand               = 0x80008099,
    LibHostAppRootFindFailure           = 0x8000809a,
    SdkResolverResolveFailure           = 0x8000809b,
    FrameworkCompatFailure              = 0x8000809c,
    FrameworkCompatRetry                = 0x8000809d,
    BundleExtractionFailure             = 0x8000809f,
    BundleExtractionIOError             = 0x800080a0,
    LibHostDuplicateProperty            = 0x800080a1,
    HostApiUnsupportedVersion           = 0x800080a2,
    HostInvalidState                    = 0x800080a3,
    HostPropertyNotFound                = 0x800080a4,
    CoreHostIncompatibleConfig          = 0x800080a5,
    HostApiUnsupportedScenario          = 0x800080a6,
    HostFeatureDisabled                 = 0x800080a7,
}

impl StatusCode {
    pub fn from_raw(value: u32) -> Option<StatusCode> {
        let code = match value {
            0 => StatusCode::Success,
            0x00000001 => StatusCode::Success_HostAlreadyInitialized,
            0x00000002 => StatusCode::Success_DifferentRuntimeProperties,
            0x80008081 => StatusCode::InvalidArgFailure,
            0x80008082 => StatusCode::CoreHostLibLoadFailure,
            0x80008083 => StatusCode::CoreHostLibMissingFailure,
            0x80008084 => StatusCode::CoreHostEntryPointFailure,
            0x80008085 => StatusCode::CoreHostCurHostFindFailure,
            0x80008087 => StatusCode::CoreClrResolveFailure,
            0x80008088 => StatusCode::CoreClrBindFailure,
            0x80008089 => StatusCode::CoreClrInitFailure,
            0x8000808a => StatusCode::CoreClrExeFailure,
            0x8000808b => StatusCode::ResolverInitFailure,
            0x8000808c => StatusCode::ResolverResolveFailure,
            0x8000808d => StatusCode::LibHostCurExeFindFailure,
            0x8000808e => StatusCode::LibHostInitFailure,
            0x80008090 => StatusCode::LibHostExecModeFailure,
            0x80008091 => StatusCode::LibHostSdkFindFailure,
            0x80008092 => StatusCode::LibHostInvalidArgs,
            0x80008093 => StatusCode::InvalidConfigFile,
            0x80008094 => StatusCode::AppArgNotRunnable,
            0x80008095 => StatusCode::AppHostExeNotBoundFailure,
            0x80008096 => StatusCode::FrameworkMissingFailure,
            0x80008097 => StatusCode::HostApiFailed,
            0x80008098 => StatusCode::HostApiBufferTooSmall,
            0x80008099 => StatusCode::LibHostUnknownCommand,
            0x8000809a => StatusCode::LibHostAppRootFindFailure,
            0x8000809b => StatusCode::SdkResolverResolveFailure,
            0x8000809c => StatusCode::FrameworkCompatFailure,
            0x8000809d => StatusCode::FrameworkCompatRetry,
            0x8000809f => StatusCode::BundleExtractionFailure,
            0x800080a0 => StatusCode::BundleExtractionIOError,
            0x800080a1 => StatusCode::LibHostDuplicateProperty,
            0x800080a2 => StatusCode::HostApiUnsupportedVersion,
            0x800080a3 => StatusCode::HostInvalidState,
            0x800080a4 => StatusCode::HostPropertyNotFound,
            0x800080a5 => StatusCode::CoreHostIncompatibleConfig,
            0x800080a6 => StatusCode::HostApiUnsupportedScenario,
            0x800080a7 => StatusCode::HostFeatureDisabled,
            _ => {
                return None;
            }
        };
        Some(code)
    }
}

#[derive(Debug)]
pub enum Error {
    PathResolution(Option<String>),
    LibraryLoad(libloading::Error),
    ExportMissing(HostingExport),
    Initialize(std::ffi::c_int),
    GetDelegate(std::ffi::c_int),
    ResolveMethod(std::ffi::c_int),
    HostingLibraryNotLoaded,
    DelegateNotLoaded,
    MethodNotDeclared(String),
    SignatureMismatch {
        expected: MethodSignature,
        actual: MethodSignature,
    },
    InvalidString(Option<String>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("{:?}", self).as_ref())
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
