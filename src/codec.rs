use std::path::Path;

use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageFormat, ImageReader};
use tracing::debug;

use crate::config::Quality;
use crate::errors::{Result, WebpinatorError};
use crate::imageops::{self, TrimOptions};
use crate::traits::ImageCodec;

/// Largest width or height a WEBP bitstream can describe.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Production codec: `image` for decoding and lossless output, libwebp via
/// the `webp` crate for lossy output.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpCodec;

impl WebpCodec {
    pub const fn new() -> Self {
        Self
    }

    fn encode_lossless(image: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        let mut buffer = Vec::new();
        let encoder = WebPEncoder::new_lossless(&mut buffer);

        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            encoder.encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)?;
        } else {
            let rgb = image.to_rgb8();
            encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }

        Ok(buffer)
    }

    fn encode_lossy(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();

        let encoded = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_simple(false, f32::from(quality))
        } else {
            let rgb = image.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height)
                .encode_simple(false, f32::from(quality))
        };
        let memory = encoded.map_err(|e| WebpinatorError::Encode {
            reason: format!("libwebp rejected the image: {:?}", e),
        })?;

        Ok(memory.to_vec())
    }
}

/// Whether this build can decode `format`. AVIF decoding needs the
/// `formats-avif` feature, not just `image`'s AVIF encoder.
fn decoding_enabled(format: ImageFormat) -> bool {
    match format {
        ImageFormat::Avif => cfg!(feature = "formats-avif"),
        other => other.reading_enabled(),
    }
}

impl ImageCodec for WebpCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        let decode_error = |source: image::ImageError| WebpinatorError::ImageProcessing {
            path: path.display().to_string(),
            operation: "decode".to_string(),
            source: Box::new(source),
        };

        let reader = ImageReader::open(path)
            .map_err(|e| WebpinatorError::FileSystem {
                path: path.to_path_buf(),
                operation: "open".to_string(),
                source: e,
            })?
            .with_guessed_format()
            .map_err(|e| WebpinatorError::FileSystem {
                path: path.to_path_buf(),
                operation: "read".to_string(),
                source: e,
            })?;

        if let Some(format) = reader.format() {
            if !decoding_enabled(format) {
                return Err(WebpinatorError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format,
                });
            }
        }

        let image = reader.decode().map_err(decode_error)?;

        debug!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );
        Ok(image)
    }

    fn trim(&self, image: DynamicImage, options: &TrimOptions) -> Result<DynamicImage> {
        Ok(imageops::trim(image, options))
    }

    fn encode_webp(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(WebpinatorError::Encode {
                reason: "image has no pixels".to_string(),
            });
        }
        if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(WebpinatorError::Encode {
                reason: format!(
                    "{}x{} exceeds the WEBP limit of {} pixels per side",
                    width, height, WEBP_MAX_DIMENSION
                ),
            });
        }

        match quality {
            Quality::Lossless => Self::encode_lossless(image),
            Quality::Lossy(value) => Self::encode_lossy(image, value),
        }
    }
}
