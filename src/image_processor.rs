use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Quality;
use crate::discovery::DiscoveredImage;
use crate::errors::{Result, WebpinatorError};
use crate::imageops::TrimOptions;
use crate::naming::output_path;
use crate::traits::ImageCodec;

/// Outcome of converting one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub success: bool,
    pub error: Option<String>,
}

impl ConversionResult {
    fn converted(source: &Path, destination: PathBuf) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: Some(destination),
            success: true,
            error: None,
        }
    }

    fn failed(source: &Path, error: &WebpinatorError) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: None,
            success: false,
            error: Some(error.chain_message()),
        }
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Runs decode, trim, encode and write for single images.
pub struct ImageProcessor<'a, C: ImageCodec> {
    codec: &'a C,
    output_dir: &'a Path,
    quality: Quality,
    trim: TrimOptions,
}

impl<'a, C: ImageCodec> ImageProcessor<'a, C> {
    pub fn new(codec: &'a C, output_dir: &'a Path, quality: Quality) -> Self {
        Self {
            codec,
            output_dir,
            quality,
            trim: TrimOptions::default(),
        }
    }

    /// Converts `image` into `<output_dir>/<name>.webp`. Failures are folded
    /// into the returned result rather than propagated.
    pub fn process_image(&self, image: &DiscoveredImage, name: &str) -> ConversionResult {
        let destination = output_path(self.output_dir, name);

        match self.convert(&image.path, &destination) {
            Ok(()) => {
                debug!("Wrote {}", destination.display());
                ConversionResult::converted(&image.path, destination)
            }
            Err(e) => {
                debug!("Error occurred on {:?}: {}", image.file_name(), e.chain_message());
                ConversionResult::failed(&image.path, &e)
            }
        }
    }

    fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        let decoded = self.codec.decode(source)?;
        let trimmed = self.codec.trim(decoded, &self.trim)?;
        let encoded = self.codec.encode_webp(&trimmed, self.quality)?;

        fs::write(destination, encoded).map_err(|e| {
            // never leave a truncated file behind
            let _ = fs::remove_file(destination);
            WebpinatorError::FileSystem {
                path: destination.to_path_buf(),
                operation: "write".to_string(),
                source: e,
            }
        })
    }
}
