use crate::error::{Error, Result};
use crate::hostfxr::HostChar;
use std::path::Path;

/// Owned null-terminated buffer in the hosting ABI's character type, used for
/// every string handed to hostfxr.
#[derive(Debug, Clone)]
pub struct HostString {
    buffer: Vec<HostChar>,
}

impl HostString {
    pub fn new(value: &str) -> Result<HostString> {
        Ok(HostString {
            buffer: encode(value)?,
        })
    }

    pub fn from_path(path: &Path) -> Result<HostString> {
        let value = path.to_str().ok_or(Error::InvalidString(Some(format!(
            "{:?} is not valid unicode",
            path
        ))))?;
        Self::new(value)
    }

    pub fn as_ptr(&self) -> *const HostChar {
        self.buffer.as_ptr()
    }
}

#[cfg(windows)]
fn encode(value: &str) -> Result<Vec<HostChar>> {
    use std::os::windows::ffi::OsStrExt;
    if value.bytes().any(|byte| byte == 0) {
        return Err(Error::InvalidString(Some(format!(
            "interior nul in {:?}",
            value
        ))));
    }
    Ok(std::ffi::OsStr::new(value)
        .encode_wide()
        .chain(Some(0))
        .collect())
}

#[cfg(not(windows))]
fn encode(value: &str) -> Result<Vec<HostChar>> {
    let value = std::ffi::CString::new(value)
        .map_err(|err| Error::InvalidString(Some(err.to_string())))?;
    Ok(value
        .into_bytes_with_nul()
        .into_iter()
        .map(|byte| byte as HostChar)
        .collect())
}

#[cfg(test)]
mod test {
    use super::HostString;
    use crate::error::Error;

    #[test]
    fn test_case() {
        let value = HostString::new("Test").unwrap();
        assert_eq!(value.buffer.len(), 5);
        assert_eq!(value.buffer[4], 0);
        assert!(value.buffer[0..4].iter().all(|unit| *unit != 0));

        let empty = HostString::new("").unwrap();
        assert_eq!(empty.buffer.len(), 1);
        assert_eq!(empty.buffer[0], 0);
    }

    #[test]
    fn test_case_interior_nul() {
        let result = HostString::new("a\0b");
        assert!(matches!(result, Err(Error::InvalidString(_))));
    }

    #[test]
    fn test_case_from_path() {
        let value = HostString::from_path(std::path::Path::new("app.runtimeconfig.json")).unwrap();
        assert_eq!(value.buffer.len(), "app.runtimeconfig.json".len() + 1);
    }
}
