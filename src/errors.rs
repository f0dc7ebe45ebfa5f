use image::ImageFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for a conversion run.
///
/// Fatal variants (`MissingDirectory`, `NoImagesFound`, and a `FileSystem`
/// failure while preparing the output directory) stop the run. The remaining
/// variants are raised per image and end up in that image's
/// [`ConversionResult`](crate::ConversionResult) instead.
#[derive(Error, Debug)]
pub enum WebpinatorError {
    #[error("The input or (parent of) output directory doesn't exist.")]
    MissingDirectory { path: PathBuf },

    #[error(
        "No image files were found. Do any files in your input directory end with a valid image format? (jp(e)g, png, gif, bmp, tiff, webp, avif)"
    )]
    NoImagesFound { input_dir: PathBuf },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error: {operation} failed (file: {path})")]
    ImageProcessing {
        path: String,
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unsupported format: {format:?} decoding is not enabled in this build (file: {path:?})")]
    UnsupportedFormat { path: PathBuf, format: ImageFormat },

    #[error("WEBP encoding error: {reason}")]
    Encode { reason: String },
}

pub type Result<T> = std::result::Result<T, WebpinatorError>;

impl WebpinatorError {
    /// Whether this error ends the whole run rather than a single image.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingDirectory { .. } | Self::NoImagesFound { .. }
        )
    }

    /// Renders the error together with its source chain on one line.
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Code that knows the path and operation should construct `FileSystem`
/// directly; this only covers plumbing where neither is available.
impl From<std::io::Error> for WebpinatorError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

/// Convert image crate errors to image processing errors.
///
/// Callers that know the file should build `ImageProcessing` themselves; this
/// is the fallback for helpers that only see pixels.
impl From<image::ImageError> for WebpinatorError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageProcessing {
            path: "unknown".to_string(),
            operation: "image processing".to_string(),
            source: Box::new(err),
        }
    }
}
