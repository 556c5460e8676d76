use std::ffi::CStr;

/// String value crossing the native/managed boundary. A single raw pointer to
/// a null-terminated UTF-8 buffer, matching the managed side's
/// `struct NativeString { IntPtr rawString; }`.
///
/// No ownership transfer and no copying happen on either side: whoever
/// produced the buffer must keep it alive for the duration of the call (for
/// arguments) or until the caller has consumed it (for return values).
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct NativeString {
    raw: *const libc::c_char,
}

impl NativeString {
    pub fn from_cstr(value: &CStr) -> NativeString {
        NativeString {
            raw: value.as_ptr(),
        }
    }

    pub fn null() -> NativeString {
        NativeString {
            raw: std::ptr::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    pub fn as_ptr(&self) -> *const libc::c_char {
        self.raw
    }

    /// # Safety
    ///
    /// The wrapped pointer must either be null or point at a null-terminated
    /// buffer that outlives the returned reference.
    pub unsafe fn as_cstr<'a>(&self) -> Option<&'a CStr> {
        if self.raw.is_null() {
            None
        } else {
            Some(CStr::from_ptr(self.raw))
        }
    }
}
