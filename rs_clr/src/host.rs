use crate::error::{Error, Result, StatusCode};
use crate::host_string::HostString;
use crate::hostfxr::{
    unmanaged_callers_only_method, HostfxrCloseFn, HostfxrGetRuntimeDelegateFn,
    HostfxrInitializeForRuntimeConfigFn, LoadAssemblyAndGetFunctionPointerFn,
    HDT_LOAD_ASSEMBLY_AND_GET_FUNCTION_POINTER,
};
use std::path::Path;

/// Outcome of a successful bootstrap. The hosting contract documents status
/// `1` as "host already initialized, reuse it"; it is surfaced here instead of
/// being folded into plain success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLoadState {
    Initialized,
    AlreadyInitialized,
}

/// The three well-known hostfxr exports, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostingExport {
    InitializeForRuntimeConfig,
    GetRuntimeDelegate,
    Close,
}

impl HostingExport {
    pub fn symbol_name(&self) -> &'static str {
        match self {
            HostingExport::InitializeForRuntimeConfig => "hostfxr_initialize_for_runtime_config",
            HostingExport::GetRuntimeDelegate => "hostfxr_get_runtime_delegate",
            HostingExport::Close => "hostfxr_close",
        }
    }
}

pub(crate) struct HostingExports {
    pub(crate) initialize_for_runtime_config: HostfxrInitializeForRuntimeConfigFn,
    pub(crate) get_runtime_delegate: HostfxrGetRuntimeDelegateFn,
    pub(crate) close: HostfxrCloseFn,
}

impl HostingExports {
    /// Resolves the three exports through `lookup`, failing with the specific
    /// missing export, in symbol-resolution order.
    pub(crate) fn resolve<F>(mut lookup: F) -> Result<HostingExports>
    where
        F: FnMut(&str) -> Option<*mut libc::c_void>,
    {
        let initialize = Self::export(&mut lookup, HostingExport::InitializeForRuntimeConfig)?;
        let get_delegate = Self::export(&mut lookup, HostingExport::GetRuntimeDelegate)?;
        let close = Self::export(&mut lookup, HostingExport::Close)?;
        unsafe {
            Ok(HostingExports {
                initialize_for_runtime_config: std::mem::transmute::<
                    *mut libc::c_void,
                    HostfxrInitializeForRuntimeConfigFn,
                >(initialize),
                get_runtime_delegate: std::mem::transmute::<
                    *mut libc::c_void,
                    HostfxrGetRuntimeDelegateFn,
                >(get_delegate),
                close: std::mem::transmute::<*mut libc::c_void, HostfxrCloseFn>(close),
            })
        }
    }

    fn export<F>(lookup: &mut F, which: HostingExport) -> Result<*mut libc::c_void>
    where
        F: FnMut(&str) -> Option<*mut libc::c_void>,
    {
        match lookup(which.symbol_name()) {
            Some(pointer) if !pointer.is_null() => Ok(pointer),
            _ => Err(Error::ExportMissing(which)),
        }
    }
}

/// Hosts the .NET runtime in this process. One bootstrap, then any number of
/// managed method resolutions.
///
/// Not `Sync`; a caller sharing it across threads must add its own
/// synchronization, and bootstrap must happen-before all use.
pub struct ClrHost {
    exports: Option<HostingExports>,
    load_assembly_fn: Option<LoadAssemblyAndGetFunctionPointerFn>,
    assembly_path: Option<HostString>,
    last_status: std::ffi::c_int,
}

impl ClrHost {
    pub fn new() -> ClrHost {
        ClrHost {
            exports: None,
            load_assembly_fn: None,
            assembly_path: None,
            last_status: 0,
        }
    }

    /// Raw status of the most recent hosting-API call, kept for diagnostics.
    pub fn last_status(&self) -> std::ffi::c_int {
        self.last_status
    }

    pub fn is_ready(&self) -> bool {
        self.load_assembly_fn.is_some() && self.assembly_path.is_some()
    }

    /// Locates and loads hostfxr, then resolves its three exports.
    pub fn load_hosting_library(&mut self) -> Result<()> {
        let hostfxr_path = crate::discovery::find_hostfxr()?;
        let library =
            unsafe { libloading::Library::new(&hostfxr_path) }.map_err(Error::LibraryLoad)?;
        let exports = HostingExports::resolve(|name| {
            match unsafe { library.get::<*mut libc::c_void>(name.as_bytes()) } {
                Ok(symbol) => Some(*symbol),
                Err(err) => {
                    log::warn!("export {} not found: {}", name, err);
                    None
                }
            }
        })?;
        // hostfxr stays mapped for the rest of the process. Unloading it
        // would invalidate the runtime delegate and every resolved method.
        std::mem::forget(library);
        self.exports = Some(exports);
        Ok(())
    }

    /// Initializes a runtime context from `runtime_config_path` and obtains
    /// the load-assembly-and-get-function-pointer delegate. The context is
    /// single-use and is closed before returning, success or failure.
    pub fn acquire_load_assembly_delegate(
        &mut self,
        runtime_config_path: impl AsRef<Path>,
    ) -> Result<HostLoadState> {
        let exports = self
            .exports
            .as_ref()
            .ok_or(Error::HostingLibraryNotLoaded)?;
        let config_path = HostString::from_path(runtime_config_path.as_ref())?;

        let mut context: *mut libc::c_void = std::ptr::null_mut();
        let status = unsafe {
            (exports.initialize_for_runtime_config)(
                config_path.as_ptr(),
                std::ptr::null(),
                &mut context,
            )
        };
        self.last_status = status;
        let state = match StatusCode::from_raw(status as u32) {
            Some(StatusCode::Success) => HostLoadState::Initialized,
            Some(StatusCode::Success_HostAlreadyInitialized) => HostLoadState::AlreadyInitialized,
            decoded => {
                log::warn!(
                    "hostfxr_initialize_for_runtime_config returned {:#x} ({:?})",
                    status,
                    decoded
                );
                if !context.is_null() {
                    unsafe { (exports.close)(context) };
                }
                return Err(Error::Initialize(status));
            }
        };
        if context.is_null() {
            return Err(Error::Initialize(status));
        }

        let mut delegate: *mut libc::c_void = std::ptr::null_mut();
        let status = unsafe {
            (exports.get_runtime_delegate)(
                context,
                HDT_LOAD_ASSEMBLY_AND_GET_FUNCTION_POINTER,
                &mut delegate,
            )
        };
        self.last_status = status;
        unsafe { (exports.close)(context) };
        if StatusCode::from_raw(status as u32) != Some(StatusCode::Success) || delegate.is_null() {
            log::warn!("hostfxr_get_runtime_delegate returned {:#x}", status);
            return Err(Error::GetDelegate(status));
        }

        self.load_assembly_fn = Some(unsafe {
            std::mem::transmute::<*mut libc::c_void, LoadAssemblyAndGetFunctionPointerFn>(delegate)
        });
        Ok(state)
    }

    /// Composes `load_hosting_library` and `acquire_load_assembly_delegate`,
    /// remembering `assembly_path` for later method lookups only if both
    /// steps succeed.
    pub fn create(
        &mut self,
        runtime_config_path: impl AsRef<Path>,
        assembly_path: impl AsRef<Path>,
    ) -> Result<HostLoadState> {
        self.load_hosting_library()?;
        let state = self.acquire_load_assembly_delegate(runtime_config_path)?;
        self.assembly_path = Some(HostString::from_path(assembly_path.as_ref())?);
        log::debug!("runtime host ready, state: {:?}", state);
        Ok(state)
    }

    /// Resolves a managed `[UnmanagedCallersOnly]` method as a raw function
    /// pointer. Prefer going through `registry::MethodRegistry`, which tags
    /// the pointer with its declared signature.
    pub fn resolve_method_pointer(
        &mut self,
        type_name: &str,
        method_name: &str,
    ) -> Result<*mut libc::c_void> {
        let load_assembly_fn = self.load_assembly_fn.ok_or(Error::DelegateNotLoaded)?;
        let assembly_path = self.assembly_path.as_ref().ok_or(Error::DelegateNotLoaded)?;
        let type_name_buffer = HostString::new(type_name)?;
        let method_name_buffer = HostString::new(method_name)?;

        let mut method: *mut libc::c_void = std::ptr::null_mut();
        let status = unsafe {
            load_assembly_fn(
                assembly_path.as_ptr(),
                type_name_buffer.as_ptr(),
                method_name_buffer.as_ptr(),
                unmanaged_callers_only_method(),
                std::ptr::null_mut(),
                &mut method,
            )
        };
        self.last_status = status;
        if StatusCode::from_raw(status as u32) != Some(StatusCode::Success) || method.is_null() {
            log::warn!(
                "load_assembly_and_get_function_pointer for {}.{} returned {:#x}",
                type_name,
                method_name,
                status
            );
            return Err(Error::ResolveMethod(status));
        }
        Ok(method)
    }

    #[cfg(test)]
    pub(crate) fn with_delegate(
        load_assembly_fn: LoadAssemblyAndGetFunctionPointerFn,
        assembly_path: &str,
    ) -> ClrHost {
        ClrHost {
            exports: None,
            load_assembly_fn: Some(load_assembly_fn),
            assembly_path: Some(HostString::new(assembly_path).unwrap()),
            last_status: 0,
        }
    }
}

impl Default for ClrHost {
    fn default() -> Self {
        Self::new()
    }
}
