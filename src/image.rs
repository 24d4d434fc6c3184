//! Image inputs: an unpacked directory or a tar archive
//!
//! Archives are unpacked into a temporary directory owned by the returned
//! [`ResolvedImage`]; dropping it removes the directory.

use crate::error::ImageError;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::{Archive, EntryType};
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

/// Recognized input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Directory,
    TarBzip2,
    TarGzip,
    Tar,
}

/// A directory ready for comparison
#[derive(Debug)]
pub struct ResolvedImage {
    source: PathBuf,
    root: PathBuf,
    kind: ImageKind,
    _extracted: Option<TempDir>,
}

impl ResolvedImage {
    /// The path the user passed in
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory holding the image's files
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }
}

/// Detect the kind of an input path
///
/// Archives are recognized by their leading bytes rather than their file
/// name, so a `.tar.bz2` renamed to anything still unpacks.
pub fn detect_kind(path: &Path) -> Result<ImageKind, ImageError> {
    let metadata = std::fs::metadata(path).map_err(|_| ImageError::NotFound(path.to_path_buf()))?;
    if metadata.is_dir() {
        return Ok(ImageKind::Directory);
    }
    if !metadata.is_file() {
        return Err(ImageError::Unsupported(path.to_path_buf()));
    }

    let mut header = [0u8; 512];
    let read = read_header(path, &mut header).map_err(|e| ImageError::Extract {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let header = &header[..read];

    if header.starts_with(b"BZh") {
        Ok(ImageKind::TarBzip2)
    } else if header.starts_with(&[0x1f, 0x8b]) {
        Ok(ImageKind::TarGzip)
    } else if header.len() >= 262 && &header[257..262] == b"ustar" {
        Ok(ImageKind::Tar)
    } else {
        Err(ImageError::Unsupported(path.to_path_buf()))
    }
}

fn read_header(path: &Path, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut file = File::open(path)?;
    let mut filled = 0;
    while filled < buffer.len() {
        match file.read(&mut buffer[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Resolve a CLI input into a directory to compare
pub fn resolve(path: &Path) -> Result<ResolvedImage, ImageError> {
    let kind = detect_kind(path)?;
    open(path, kind)
}

/// Resolve both inputs of a comparison
///
/// Both kinds are detected before either archive is unpacked, so a bad second
/// input fails without paying for the first extraction.
pub fn resolve_pair(
    left: &Path,
    right: &Path,
) -> Result<(ResolvedImage, ResolvedImage), ImageError> {
    let left_kind = detect_kind(left)?;
    let right_kind = detect_kind(right)?;
    let left = open(left, left_kind)?;
    let right = open(right, right_kind)?;
    Ok((left, right))
}

#[instrument(skip(path), fields(image = %path.display()))]
fn open(path: &Path, kind: ImageKind) -> Result<ResolvedImage, ImageError> {
    debug!(?kind, "Detected image kind");

    if kind == ImageKind::Directory {
        return Ok(ResolvedImage {
            source: path.to_path_buf(),
            root: path.to_path_buf(),
            kind,
            _extracted: None,
        });
    }

    let temp_dir = tempfile::Builder::new()
        .prefix("imgdiff-")
        .tempdir()
        .map_err(|e| ImageError::Extract {
            path: path.to_path_buf(),
            message: format!("Failed to create temporary directory: {}", e),
        })?;
    extract_archive(path, kind, temp_dir.path())?;
    info!(dest = %temp_dir.path().display(), "Unpacked image");

    Ok(ResolvedImage {
        source: path.to_path_buf(),
        root: temp_dir.path().to_path_buf(),
        kind,
        _extracted: Some(temp_dir),
    })
}

/// Unpack an archive of the given kind into `dest_dir`
pub fn extract_archive(
    archive_path: &Path,
    kind: ImageKind,
    dest_dir: &Path,
) -> Result<(), ImageError> {
    let file = File::open(archive_path).map_err(|e| ImageError::Extract {
        path: archive_path.to_path_buf(),
        message: format!("Failed to open archive: {}", e),
    })?;

    let unpacked = match kind {
        ImageKind::TarBzip2 => unpack(BzDecoder::new(file), dest_dir),
        ImageKind::TarGzip => unpack(GzDecoder::new(file), dest_dir),
        ImageKind::Tar => unpack(file, dest_dir),
        ImageKind::Directory => return Err(ImageError::Unsupported(archive_path.to_path_buf())),
    };

    unpacked.map_err(|e| ImageError::Extract {
        path: archive_path.to_path_buf(),
        message: format!("Failed to extract archive to {}: {}", dest_dir.display(), e),
    })
}

/// Unpack every entry except device nodes and FIFOs
///
/// tar writes entry types it cannot create as empty regular files, which
/// would then be hashed as files. Directory entries are applied last so a
/// read-only directory mode cannot block its own contents.
fn unpack<R: Read>(reader: R, dest_dir: &Path) -> std::io::Result<()> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_mtime(true);
    archive.set_unpack_xattrs(false);

    let mut directories = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_type = entry.header().entry_type();
        match entry_type {
            EntryType::Char | EntryType::Block | EntryType::Fifo => {
                warn!(
                    path = %String::from_utf8_lossy(&entry.path_bytes()),
                    ?entry_type,
                    "Skipping special file in archive"
                );
            }
            EntryType::Directory => directories.push(entry),
            _ => {
                entry.unpack_in(dest_dir)?;
            }
        }
    }
    for mut directory in directories {
        directory.unpack_in(dest_dir)?;
    }
    Ok(())
}
