//! Zip archives of top-level subdirectories.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::listing::top_level_dirs;
use super::StagingError;

/// Zip every immediate subdirectory of `source_dir` into `destination_dir`.
///
/// `source_dir/pkg` becomes `destination_dir/pkg.zip`, holding the contents
/// of `pkg` relative to `pkg` itself. Top-level files of `source_dir` are
/// ignored. Existing archives with the same name are overwritten.
///
/// Returns the written archive paths, sorted.
pub fn archive_top_level_dirs(
    source_dir: &Path,
    destination_dir: &Path,
) -> Result<Vec<PathBuf>, StagingError> {
    let mut archives = Vec::new();

    for dir in top_level_dirs(source_dir)? {
        let Some(name) = dir.file_name() else {
            continue;
        };
        let mut file_name = name.to_os_string();
        file_name.push(".zip");

        let archive_path = destination_dir.join(file_name);
        zip_dir(&dir, &archive_path)?;
        archives.push(archive_path);
    }

    Ok(archives)
}

fn zip_dir(dir: &Path, archive_path: &Path) -> Result<(), StagingError> {
    let zip_err = |source: zip::result::ZipError| StagingError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::create(archive_path).map_err(|e| zip_err(e.into()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| StagingError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = entry_name(relative);

        if entry.file_type().is_dir() {
            writer.add_directory(name, options).map_err(zip_err)?;
        } else {
            writer.start_file(name, options).map_err(zip_err)?;
            let mut input = File::open(entry.path()).map_err(|e| zip_err(e.into()))?;
            io::copy(&mut input, &mut writer).map_err(|e| zip_err(e.into()))?;
        }
    }

    writer.finish().map_err(zip_err)?;
    Ok(())
}

/// Zip entry names always use `/`.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
