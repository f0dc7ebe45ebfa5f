use std::path::Path;

use image::DynamicImage;

use crate::config::{Quality, RunConfig};
use crate::discovery::DiscoveredImage;
use crate::errors::Result;
use crate::image_processor::ConversionResult;
use crate::imageops::TrimOptions;

/// The image library operations a conversion needs.
///
/// Kept behind a trait so the run loop can be exercised without real codecs.
pub trait ImageCodec: Send + Sync {
    /// Decodes the file at `path`, detecting its format from the content.
    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    /// Crops away the border that matches `options.background`.
    fn trim(&self, image: DynamicImage, options: &TrimOptions) -> Result<DynamicImage>;

    /// Encodes `image` as a complete WEBP file.
    fn encode_webp(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>>;
}

/// Receives progress notifications while a run is in flight.
///
/// Every method has an empty default so observers only pick what they show.
pub trait RunObserver {
    fn run_started(&mut self, _config: &RunConfig, _image_count: usize) {}

    fn image_started(&mut self, _image: &DiscoveredImage) {}

    fn image_finished(&mut self, _result: &ConversionResult) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}
