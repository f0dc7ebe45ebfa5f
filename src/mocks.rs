use std::path::Path;
use std::sync::Mutex;

use image::{DynamicImage, Rgba, RgbaImage};

use crate::config::Quality;
use crate::errors::{Result, WebpinatorError};
use crate::imageops::TrimOptions;
use crate::traits::ImageCodec;

/// Test codec that never touches real image data.
///
/// Files whose name contains the configured marker fail to decode; every
/// other file "encodes" to [`MockCodec::OUTPUT`].
#[derive(Debug, Default)]
pub struct MockCodec {
    fail_marker: Option<String>,
    qualities: Mutex<Vec<Quality>>,
}

impl MockCodec {
    pub const OUTPUT: &'static [u8] = b"RIFF\0\0\0\0WEBPmock";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::default()
        }
    }

    /// Qualities passed to `encode_webp`, in call order.
    pub fn encoded_qualities(&self) -> Vec<Quality> {
        self.qualities
            .lock()
            .map(|qualities| qualities.clone())
            .unwrap_or_default()
    }
}

impl ImageCodec for MockCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(marker) = &self.fail_marker {
            if name.contains(marker.as_str()) {
                return Err(WebpinatorError::ImageProcessing {
                    path: path.display().to_string(),
                    operation: "decode".to_string(),
                    source: Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "mock decode failure",
                    )),
                });
            }
        }

        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([255, 0, 0, 255]),
        )))
    }

    fn trim(&self, image: DynamicImage, _options: &TrimOptions) -> Result<DynamicImage> {
        Ok(image)
    }

    fn encode_webp(&self, _image: &DynamicImage, quality: Quality) -> Result<Vec<u8>> {
        if let Ok(mut qualities) = self.qualities.lock() {
            qualities.push(quality);
        }
        Ok(Self::OUTPUT.to_vec())
    }
}
