//! Path canonicalization and relative key construction

use crate::error::TreeError;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Canonicalize an input root so every entry path can be made relative to it
///
/// Uses dunce so Windows roots do not come back in `\\?\` form.
pub fn canonicalize_root(path: &Path) -> Result<PathBuf, TreeError> {
    dunce::canonicalize(path)
        .map_err(|e| TreeError::InvalidPath(format!("Failed to canonicalize {:?}: {}", path, e)))
}

/// Build the comparison key for `path` relative to `root`
///
/// Segments are joined with `/` independent of the native separator. Names
/// keep their exact bytes: no Unicode normalization is applied, so two names
/// that differ only in normalization form stay two keys. Bytes that are not
/// valid UTF-8 are escaped as `\xNN` and a literal backslash as `\\`, which
/// keeps the key injective.
pub fn relative_key(root: &Path, path: &Path) -> Result<String, TreeError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        TreeError::InvalidPath(format!("{:?} is not under root {:?}", path, root))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(escape_name(name)?),
            Component::CurDir => {}
            other => {
                return Err(TreeError::InvalidPath(format!(
                    "Unexpected component {:?} in {:?}",
                    other, path
                )))
            }
        }
    }

    if segments.is_empty() {
        return Err(TreeError::InvalidPath(format!(
            "{:?} has no components relative to {:?}",
            path, root
        )));
    }

    Ok(segments.join("/"))
}

#[cfg(unix)]
fn escape_name(name: &OsStr) -> Result<String, TreeError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(escape_bytes(name.as_bytes()))
}

#[cfg(not(unix))]
fn escape_name(name: &OsStr) -> Result<String, TreeError> {
    name.to_str()
        .map(|s| escape_bytes(s.as_bytes()))
        .ok_or_else(|| TreeError::InvalidPath(format!("Unrepresentable file name {:?}", name)))
}

/// Lossless text form of a raw file name
pub fn escape_bytes(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                push_escaped_str(&mut out, valid);
                break;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                // valid_up_to marks a UTF-8 boundary
                if let Ok(valid) = std::str::from_utf8(valid) {
                    push_escaped_str(&mut out, valid);
                }
                let invalid_len = e.error_len().unwrap_or(rest.len());
                for byte in &rest[..invalid_len] {
                    out.push_str(&format!("\\x{:02x}", byte));
                }
                bytes = &rest[invalid_len..];
            }
        }
    }
    out
}

fn push_escaped_str(out: &mut String, s: &str) {
    for c in s.chars() {
        if c == '\\' {
            out.push_str("\\\\");
        } else {
            out.push(c);
        }
    }
}

/// Parent directory of a key, `None` for entries directly under the root
pub fn parent_key(key: &str) -> Option<&str> {
    key.rfind('/').map(|idx| &key[..idx])
}
