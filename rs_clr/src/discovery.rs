use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Locates the hostfxr shared library by probing `DOTNET_ROOT` and the
/// platform's default install roots for `host/fxr/<version>/`.
pub fn find_hostfxr() -> Result<PathBuf> {
    for root in install_roots() {
        if let Some(path) = find_hostfxr_in_root(&root) {
            log::debug!("hostfxr library path: {:?}", path);
            return Ok(path);
        }
    }
    Err(Error::PathResolution(Some(
        "no dotnet installation found, set DOTNET_ROOT".to_string(),
    )))
}

fn install_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    if let Ok(root) = std::env::var("DOTNET_ROOT") {
        if !root.is_empty() {
            roots.push(PathBuf::from(root));
        }
    }
    for root in default_install_roots() {
        roots.push(PathBuf::from(root));
    }
    roots
}

fn default_install_roots() -> Vec<&'static str> {
    #[cfg(target_os = "windows")]
    let roots = vec![r"C:\Program Files\dotnet"];
    #[cfg(target_os = "macos")]
    let roots = vec!["/usr/local/share/dotnet"];
    #[cfg(target_os = "linux")]
    let roots = vec!["/usr/share/dotnet", "/usr/lib/dotnet"];
    roots
}

pub(crate) fn find_hostfxr_in_root(root: &Path) -> Option<PathBuf> {
    let fxr_dir = root.join("host").join("fxr");
    let version_dir = pick_latest_version(&fxr_dir)?;
    let candidate = version_dir.join(hostfxr_file_name());
    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

fn pick_latest_version(fxr_dir: &Path) -> Option<PathBuf> {
    let mut best: Option<(Vec<u64>, PathBuf)> = None;
    for entry in std::fs::read_dir(fxr_dir).ok()? {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(version) = parse_version(&name) else {
            continue;
        };
        let is_newer = match best.as_ref() {
            Some((current, _)) => version > *current,
            None => true,
        };
        if is_newer {
            best = Some((version, path));
        }
    }
    best.map(|(_, path)| path)
}

// "8.0.6" or "9.0.0-preview.5": numeric components before any pre-release tag.
fn parse_version(name: &str) -> Option<Vec<u64>> {
    let release = name.split('-').next()?;
    release
        .split('.')
        .map(|component| component.parse::<u64>().ok())
        .collect()
}

fn hostfxr_file_name() -> &'static str {
    #[cfg(target_os = "windows")]
    let name = "hostfxr.dll";
    #[cfg(target_os = "macos")]
    let name = "libhostfxr.dylib";
    #[cfg(target_os = "linux")]
    let name = "libhostfxr.so";
    name
}

#[cfg(test)]
mod test {
    use super::{find_hostfxr_in_root, hostfxr_file_name, parse_version, pick_latest_version};

    fn make_root(tag: &str, versions: &[&str], library_in: Option<&str>) -> std::path::PathBuf {
        let root = std::env::temp_dir().join(format!(
            "rs_clr_discovery_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        let fxr_dir = root.join("host").join("fxr");
        for version in versions {
            std::fs::create_dir_all(fxr_dir.join(version)).unwrap();
        }
        if let Some(version) = library_in {
            std::fs::write(fxr_dir.join(version).join(hostfxr_file_name()), b"").unwrap();
        }
        root
    }

    #[test]
    fn test_case() {
        let root = make_root("latest", &["7.0.20", "8.0.6", "10.0.0"], Some("10.0.0"));
        let fxr_dir = root.join("host").join("fxr");
        let picked = pick_latest_version(&fxr_dir).unwrap();
        assert_eq!(picked, fxr_dir.join("10.0.0"));
        let library = find_hostfxr_in_root(&root).unwrap();
        assert_eq!(library, fxr_dir.join("10.0.0").join(hostfxr_file_name()));
    }

    #[test]
    fn test_case_skips_non_versions() {
        let root = make_root("skip", &["docs", "8.0.6"], Some("8.0.6"));
        let fxr_dir = root.join("host").join("fxr");
        let picked = pick_latest_version(&fxr_dir).unwrap();
        assert_eq!(picked, fxr_dir.join("8.0.6"));
    }

    #[test]
    fn test_case_missing_library_file() {
        let root = make_root("missing", &["8.0.6"], None);
        assert_eq!(find_hostfxr_in_root(&root), None);
    }

    #[test]
    fn test_case_empty_root() {
        let root = std::env::temp_dir().join(format!("rs_clr_discovery_none_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        assert_eq!(find_hostfxr_in_root(&root), None);
    }

    #[test]
    fn test_case_parse_version() {
        assert_eq!(parse_version("8.0.6"), Some(vec![8, 0, 6]));
        assert_eq!(parse_version("9.0.0-preview.5"), Some(vec![9, 0, 0]));
        assert_eq!(parse_version("docs"), None);
    }
}
