use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Extensions accepted for conversion, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "avif"];

/// An image file found under the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredImage {
    pub path: PathBuf,
}

impl DiscoveredImage {
    /// File name without its last extension; the seed for the output name.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Whether the file name ends with `.<ext>` for one of the accepted formats.
pub fn is_supported_image_format(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Lists the convertible images under `input_dir` in traversal order.
///
/// Only direct children are visited unless `recursive` is set. `skip_dir`,
/// when it lies inside `input_dir`, is never descended into.
pub fn collect_image_files(
    input_dir: &Path,
    recursive: bool,
    skip_dir: Option<&Path>,
) -> Vec<DiscoveredImage> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir() && skip_dir.is_some_and(|skip| entry.path() == skip))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_supported_image_format(entry.path()))
        .map(|entry| DiscoveredImage {
            path: entry.into_path(),
        })
        .collect()
}
