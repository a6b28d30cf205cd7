//! Directory-to-zip packaging shared by the YOLO and VOC exporters.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

/// The archive location for a directory: the same path with `.zip` appended,
/// so `out/yolo` packs into `out/yolo.zip`.
///
/// Paths whose last component is not a name (`.`, `..`, `out/yolo/..`) are
/// resolved against the file system first.
///
/// # Errors
/// [`ExportError::ArchiveWalk`] for an empty path or one that resolves to a
/// file system root; [`ExportError::Io`] if resolving fails.
pub fn archive_path_for(dir: &Path) -> Result<PathBuf, ExportError> {
    if dir.as_os_str().is_empty() {
        return Err(ExportError::ArchiveWalk {
            path: dir.to_path_buf(),
            message: "empty directory path".to_string(),
        });
    }

    // Rebuilding from components drops a trailing separator, which would
    // otherwise put the archive inside the directory.
    let named: PathBuf = if dir.file_name().is_some() {
        dir.components().collect()
    } else {
        fs::canonicalize(dir).map_err(ExportError::Io)?
    };

    let Some(name) = named.file_name() else {
        return Err(ExportError::ArchiveWalk {
            path: dir.to_path_buf(),
            message: "directory has no name to derive an archive name from".to_string(),
        });
    };
    let mut archive_name = name.to_os_string();
    archive_name.push(".zip");
    Ok(named.with_file_name(archive_name))
}

/// Packs every file under `dir` into a deflate-compressed zip next to it.
///
/// Entry names are relative to `dir` and use `/` separators. Files are
/// added in sorted walk order; directories themselves are not stored.
/// Returns the archive path.
pub fn zip_dir(dir: &Path) -> Result<PathBuf, ExportError> {
    let archive_path = archive_path_for(dir)?;
    let files = collect_files(dir, &archive_path)?;

    let file = File::create(&archive_path).map_err(ExportError::Io)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, entry_name) in &files {
        zip.start_file(entry_name.as_str(), options)
            .map_err(|source| ExportError::Archive {
                path: archive_path.clone(),
                source,
            })?;
        let mut source = File::open(path).map_err(ExportError::Io)?;
        io::copy(&mut source, &mut zip).map_err(ExportError::Io)?;
    }

    let mut writer = zip.finish().map_err(|source| ExportError::Archive {
        path: archive_path.clone(),
        source,
    })?;
    writer.flush().map_err(ExportError::Io)?;

    debug!(
        "packed {} file(s) from {} into {}",
        files.len(),
        dir.display(),
        archive_path.display()
    );
    Ok(archive_path)
}

fn collect_files(root: &Path, exclude: &Path) -> Result<Vec<(PathBuf, String)>, ExportError> {
    if !fs::metadata(root).map_err(ExportError::Io)?.is_dir() {
        return Err(ExportError::ArchiveWalk {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ExportError::ArchiveWalk {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if !entry.file_type().is_file() || entry.path() == exclude {
            continue;
        }
        let name = rel_string(root, entry.path());
        files.push((entry.into_path(), name));
    }

    Ok(files)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
