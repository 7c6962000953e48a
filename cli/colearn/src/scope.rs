//! Scope containment check for evidence paths.
//!
//! Evidence requests are only answered automatically when the requested
//! path lies inside the allowed scope root.

use std::path::{Component, Path, PathBuf};

/// Root directory evidence may be read from: `COLEARN_SCOPE_ROOT`, or the
/// working directory.
pub fn scope_root() -> PathBuf {
    match std::env::var("COLEARN_SCOPE_ROOT") {
        Ok(root) if !root.is_empty() => absolute(Path::new(&root)),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// True when `path` is the scope root itself or inside it.
///
/// Purely lexical: dot segments are resolved without touching the
/// filesystem, so the path does not need to exist.
pub fn is_path_allowed(path: impl AsRef<Path>, root: &Path) -> bool {
    normalize(&absolute(path.as_ref())).starts_with(normalize(&absolute(root)))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_itself_is_allowed() {
        assert!(is_path_allowed("/work/repo", Path::new("/work/repo")));
    }

    #[test]
    fn test_nested_path_is_allowed() {
        assert!(is_path_allowed(
            "/work/repo/src/lib.rs",
            Path::new("/work/repo")
        ));
    }

    #[test]
    fn test_sibling_path_is_rejected() {
        assert!(!is_path_allowed("/work/other", Path::new("/work/repo")));
        // Prefix of the name alone is not containment.
        assert!(!is_path_allowed("/work/repo-2/x", Path::new("/work/repo")));
    }

    #[test]
    fn test_dot_dot_escape_is_rejected() {
        assert!(!is_path_allowed(
            "/work/repo/../secrets",
            Path::new("/work/repo")
        ));
    }
}
