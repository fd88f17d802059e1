use log::{debug, info, warn};
use std::error::Error;
use std::ffi::CString;
use std::fmt;
use std::fs;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use super::mime;

/// Maps request targets to readable files under the document root.
#[derive(Debug)]
pub struct PathResolver {
    document_root: PathBuf,
    default_document: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    NotFound,
    AccessDenied,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no such document"),
            Self::AccessDenied => write!(f, "access denied"),
        }
    }
}

impl Error for ResolveError {}

#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub len: u64,
    pub content_type: &'static str,
}

impl PathResolver {
    pub fn new(document_root: PathBuf, default_document: String) -> Self {
        Self {
            document_root,
            default_document,
        }
    }

    pub fn resolve(&self, target: &str) -> Result<ResolvedFile, ResolveError> {
        if target.contains("..") {
            warn!("Path traversal attempt: {}", target);
            return Err(ResolveError::AccessDenied);
        }

        let relative = if target == "/" {
            self.default_document.as_str()
        } else {
            target
        };
        let path = self.document_root.join(relative.trim_start_matches('/'));

        if !path.exists() {
            info!("File not found: {:?}", path);
            return Err(ResolveError::NotFound);
        }

        if !path.is_file() {
            warn!("Attempt to access directory: {:?}", path);
            return Err(ResolveError::AccessDenied);
        }

        if is_restricted(&path) {
            warn!("403 Forbidden: access denied to {:?}", path);
            return Err(ResolveError::AccessDenied);
        }

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("File vanished during resolution: {:?}: {}", path, e);
                return Err(ResolveError::NotFound);
            }
        };

        let content_type = mime::content_type_for(&path);
        debug!(
            "Resolved {} to {:?} ({} bytes, {})",
            target,
            path,
            metadata.len(),
            content_type
        );

        Ok(ResolvedFile {
            path,
            len: metadata.len(),
            content_type,
        })
    }
}

/// A file is off limits when the process cannot read it or the
/// filesystem it lives on reports no usable space.
fn is_restricted(path: &Path) -> bool {
    !is_readable(path) || usable_space(path) == 0
}

fn is_readable(path: &Path) -> bool {
    let cpath = match CString::new(path.as_os_str().as_bytes()) {
        Ok(cpath) => cpath,
        Err(_) => return false,
    };

    unsafe { libc::access(cpath.as_ptr(), libc::R_OK) == 0 }
}

fn usable_space(path: &Path) -> u64 {
    let cpath = match CString::new(path.as_os_str().as_bytes()) {
        Ok(cpath) => cpath,
        Err(_) => return 0,
    };

    let mut stats: libc::statvfs = unsafe { mem::zeroed() };
    if unsafe { libc::statvfs(cpath.as_ptr(), &mut stats) } != 0 {
        return 0;
    }

    (stats.f_bavail as u64).saturating_mul(stats.f_frsize as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root(name: &str) -> PathBuf {
        let root =
            std::env::temp_dir().join(format!("resolver-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).expect("create fixture root");
        root
    }

    fn resolver(root: &Path) -> PathResolver {
        PathResolver::new(root.to_path_buf(), "index.html".to_string())
    }

    #[test]
    fn root_target_resolves_to_the_default_document() {
        let root = fixture_root("default-doc");
        fs::write(root.join("index.html"), "hello world!").expect("write fixture");

        let file = resolver(&root).resolve("/").expect("resolved");
        assert_eq!(file.path, root.join("index.html"));
        assert_eq!(file.len, 12);
        assert_eq!(file.content_type, "text/html");
    }

    #[test]
    fn nested_targets_resolve_under_the_document_root() {
        let root = fixture_root("nested");
        fs::create_dir_all(root.join("css")).expect("create subdir");
        fs::write(root.join("css/site.css"), "body {}").expect("write fixture");

        let file = resolver(&root).resolve("/css/site.css").expect("resolved");
        assert_eq!(file.len, 7);
        assert_eq!(file.content_type, "text/css");
    }

    #[test]
    fn missing_files_are_not_found() {
        let root = fixture_root("missing");

        assert!(matches!(
            resolver(&root).resolve("/nope.html"),
            Err(ResolveError::NotFound)
        ));
        // "/" maps to the default document, which is also absent here.
        assert!(matches!(
            resolver(&root).resolve("/"),
            Err(ResolveError::NotFound)
        ));
    }

    #[test]
    fn directories_are_denied() {
        let root = fixture_root("directory");
        fs::create_dir_all(root.join("assets")).expect("create subdir");

        assert!(matches!(
            resolver(&root).resolve("/assets"),
            Err(ResolveError::AccessDenied)
        ));
    }

    #[test]
    fn dotdot_targets_are_denied() {
        let root = fixture_root("traversal");
        fs::write(root.join("index.html"), "safe").expect("write fixture");

        assert!(matches!(
            resolver(&root).resolve("/../etc/passwd"),
            Err(ResolveError::AccessDenied)
        ));
    }

    #[test]
    fn unreadable_files_are_denied() {
        // access(2) succeeds for everything when running as root.
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("skipping unreadable_files_are_denied: running as root");
            return;
        }

        use std::os::unix::fs::PermissionsExt;

        let root = fixture_root("unreadable");
        let secret = root.join("secret.txt");
        fs::write(&secret, "hidden").expect("write fixture");
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).expect("chmod");

        let result = resolver(&root).resolve("/secret.txt");
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).expect("chmod back");

        assert!(matches!(result, Err(ResolveError::AccessDenied)));
    }
}
