use crate::error::{Error, Result};
use crate::host::ClrHost;
use crate::native_string::NativeString;
use std::collections::HashMap;

pub type EntryPointFn = unsafe extern "system" fn(main_program_handle: *mut libc::c_void);
pub type TakesStringFn = unsafe extern "system" fn(message: NativeString);
pub type StringToStringFn = unsafe extern "system" fn(message: NativeString) -> NativeString;
pub type ReturnsStringFn = unsafe extern "system" fn() -> NativeString;
pub type BoolToBoolFn = unsafe extern "system" fn(value: bool) -> bool;
pub type BoolCallbackFn = extern "C" fn(value: bool);
pub type StringCallbackFn = extern "C" fn(data: NativeString);
pub type TakesBoolCallbackFn = unsafe extern "system" fn(callback: BoolCallbackFn);
pub type TakesStringCallbackFn = unsafe extern "system" fn(callback: StringCallbackFn);

/// The closed set of native call signatures this host knows how to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodSignature {
    EntryPoint,
    TakesString,
    StringToString,
    ReturnsString,
    BoolToBool,
    TakesBoolCallback,
    TakesStringCallback,
}

/// A resolved managed method, tagged with the signature it was declared
/// with. Pulling it out through the wrong accessor is a recoverable
/// `SignatureMismatch`, not undefined behavior.
#[derive(Clone, Copy)]
pub enum ManagedMethod {
    EntryPoint(EntryPointFn),
    TakesString(TakesStringFn),
    StringToString(StringToStringFn),
    ReturnsString(ReturnsStringFn),
    BoolToBool(BoolToBoolFn),
    TakesBoolCallback(TakesBoolCallbackFn),
    TakesStringCallback(TakesStringCallbackFn),
}

impl ManagedMethod {
    pub fn signature(&self) -> MethodSignature {
        match self {
            ManagedMethod::EntryPoint(_) => MethodSignature::EntryPoint,
            ManagedMethod::TakesString(_) => MethodSignature::TakesString,
            ManagedMethod::StringToString(_) => MethodSignature::StringToString,
            ManagedMethod::ReturnsString(_) => MethodSignature::ReturnsString,
            ManagedMethod::BoolToBool(_) => MethodSignature::BoolToBool,
            ManagedMethod::TakesBoolCallback(_) => MethodSignature::TakesBoolCallback,
            ManagedMethod::TakesStringCallback(_) => MethodSignature::TakesStringCallback,
        }
    }

    fn mismatch(self, expected: MethodSignature) -> Error {
        Error::SignatureMismatch {
            expected,
            actual: self.signature(),
        }
    }

    pub fn into_entry_point(self) -> Result<EntryPointFn> {
        match self {
            ManagedMethod::EntryPoint(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::EntryPoint)),
        }
    }

    pub fn into_takes_string(self) -> Result<TakesStringFn> {
        match self {
            ManagedMethod::TakesString(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::TakesString)),
        }
    }

    pub fn into_string_to_string(self) -> Result<StringToStringFn> {
        match self {
            ManagedMethod::StringToString(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::StringToString)),
        }
    }

    pub fn into_returns_string(self) -> Result<ReturnsStringFn> {
        match self {
            ManagedMethod::ReturnsString(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::ReturnsString)),
        }
    }

    pub fn into_bool_to_bool(self) -> Result<BoolToBoolFn> {
        match self {
            ManagedMethod::BoolToBool(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::BoolToBool)),
        }
    }

    pub fn into_takes_bool_callback(self) -> Result<TakesBoolCallbackFn> {
        match self {
            ManagedMethod::TakesBoolCallback(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::TakesBoolCallback)),
        }
    }

    pub fn into_takes_string_callback(self) -> Result<TakesStringCallbackFn> {
        match self {
            ManagedMethod::TakesStringCallback(func) => Ok(func),
            other => Err(other.mismatch(MethodSignature::TakesStringCallback)),
        }
    }
}

impl MethodSignature {
    /// # Safety
    ///
    /// `raw` must be a non-null pointer to a managed method whose actual
    /// unmanaged signature matches this tag.
    unsafe fn tag(self, raw: *mut libc::c_void) -> ManagedMethod {
        match self {
            MethodSignature::EntryPoint => {
                ManagedMethod::EntryPoint(std::mem::transmute::<*mut libc::c_void, EntryPointFn>(
                    raw,
                ))
            }
            MethodSignature::TakesString => ManagedMethod::TakesString(std::mem::transmute::<
                *mut libc::c_void,
                TakesStringFn,
            >(raw)),
            MethodSignature::StringToString => {
                ManagedMethod::StringToString(std::mem::transmute::<
                    *mut libc::c_void,
                    StringToStringFn,
                >(raw))
            }
            MethodSignature::ReturnsString => ManagedMethod::ReturnsString(std::mem::transmute::<
                *mut libc::c_void,
                ReturnsStringFn,
            >(raw)),
            MethodSignature::BoolToBool => ManagedMethod::BoolToBool(std::mem::transmute::<
                *mut libc::c_void,
                BoolToBoolFn,
            >(raw)),
            MethodSignature::TakesBoolCallback => {
                ManagedMethod::TakesBoolCallback(std::mem::transmute::<
                    *mut libc::c_void,
                    TakesBoolCallbackFn,
                >(raw))
            }
            MethodSignature::TakesStringCallback => {
                ManagedMethod::TakesStringCallback(std::mem::transmute::<
                    *mut libc::c_void,
                    TakesStringCallbackFn,
                >(raw))
            }
        }
    }
}

/// Declares which managed methods exist and with which native signature.
/// Resolution happens through the host on every call, per call site; only the
/// declaration is kept here.
#[derive(Default)]
pub struct MethodRegistry {
    methods: HashMap<(String, String), MethodSignature>,
}

impl MethodRegistry {
    pub fn new() -> MethodRegistry {
        MethodRegistry {
            methods: HashMap::new(),
        }
    }

    pub fn declare(&mut self, type_name: &str, method_name: &str, signature: MethodSignature) {
        self.methods.insert(
            (type_name.to_string(), method_name.to_string()),
            signature,
        );
    }

    pub fn resolve(
        &self,
        host: &mut ClrHost,
        type_name: &str,
        method_name: &str,
    ) -> Result<ManagedMethod> {
        let key = (type_name.to_string(), method_name.to_string());
        let signature = *self
            .methods
            .get(&key)
            .ok_or(Error::MethodNotDeclared(format!(
                "{}.{}",
                type_name, method_name
            )))?;
        let raw = host.resolve_method_pointer(type_name, method_name)?;
        Ok(unsafe { signature.tag(raw) })
    }
}
