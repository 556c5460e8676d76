/// Character type of the hostfxr ABI. UTF-16 on Windows, UTF-8 elsewhere.
#[cfg(windows)]
pub type HostChar = u16;
#[cfg(not(windows))]
pub type HostChar = libc::c_char;

/// `hostfxr_delegate_type::hdt_load_assembly_and_get_function_pointer`.
pub const HDT_LOAD_ASSEMBLY_AND_GET_FUNCTION_POINTER: std::ffi::c_int = 5;

pub type HostfxrInitializeForRuntimeConfigFn = unsafe extern "system" fn(
    runtime_config_path: *const HostChar,
    parameters: *const libc::c_void,
    host_context_handle: *mut *mut libc::c_void,
) -> std::ffi::c_int;

pub type HostfxrGetRuntimeDelegateFn = unsafe extern "system" fn(
    host_context_handle: *const libc::c_void,
    r#type: std::ffi::c_int,
    delegate: *mut *mut libc::c_void,
) -> std::ffi::c_int;

pub type HostfxrCloseFn =
    unsafe extern "system" fn(host_context_handle: *const libc::c_void) -> std::ffi::c_int;

pub type LoadAssemblyAndGetFunctionPointerFn = unsafe extern "system" fn(
    assembly_path: *const HostChar,
    type_name: *const HostChar,
    method_name: *const HostChar,
    delegate_type_name: *const HostChar,
    reserved: *mut libc::c_void,
    delegate: *mut *mut libc::c_void,
) -> std::ffi::c_int;

/// `UNMANAGEDCALLERSONLY_METHOD` marker, meaning the target method is exposed
/// with `[UnmanagedCallersOnly]` and its own declared signature is used.
pub fn unmanaged_callers_only_method() -> *const HostChar {
    usize::MAX as *const HostChar
}
