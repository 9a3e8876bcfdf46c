// pixie/src/processors/scanner.rs
use crate::core::format::is_supported_path;
use crate::core::{ResizeError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Image files directly inside `folder`, sorted by file name.
pub fn list_images(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ResizeError::DirectoryNotFound(folder.to_path_buf()));
    }

    let paths = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", folder.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_supported_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    log::debug!("Found {} image files in {}", paths.len(), folder.display());
    Ok(paths)
}
