//! Digest computation for tree entries using BLAKE3

use crate::error::TreeError;
use crate::types::Digest;
use blake3::Hasher;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Default read size when streaming file content
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Compute the digest of a reader's full content
///
/// Digest = hash("file" || content). Content is consumed in `chunk_size`
/// pieces so memory use does not depend on the file size.
pub fn compute_stream_digest<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<Digest> {
    let mut hasher = Hasher::new();
    hasher.update(b"file");

    let mut buffer = vec![0u8; chunk_size.max(1)];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Compute the digest of a file on disk
pub fn compute_file_digest(path: &Path, chunk_size: usize) -> Result<Digest, TreeError> {
    let file = File::open(path).map_err(|source| TreeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    compute_stream_digest(file, chunk_size).map_err(|source| TreeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Compute the digest of an unfollowed symlink
///
/// Digest = hash("symlink" || target). The kind prefix keeps a link from
/// ever matching a regular file whose content spells out the same target.
pub fn compute_symlink_digest(target: &Path) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(b"symlink");
    hasher.update(&target_bytes(target));
    *hasher.finalize().as_bytes()
}

#[cfg(unix)]
fn target_bytes(target: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    target.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn target_bytes(target: &Path) -> Vec<u8> {
    target.to_string_lossy().replace('\\', "/").into_bytes()
}
