pub mod codec;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod image_processor;
pub mod imageops;
pub mod naming;
pub mod progress_tracker;
pub mod traits;

pub mod mocks;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

pub use codec::WebpCodec;
pub use config::{Config, Quality, QualityFallback, RunConfig};
pub use discovery::{collect_image_files, is_supported_image_format, DiscoveredImage};
pub use errors::{Result, WebpinatorError};
pub use image_processor::{ConversionResult, ImageProcessor};
pub use naming::OutputNamer;
pub use progress_tracker::{ProgressTracker, RunSummary};
pub use traits::*;

/// One conversion run over a resolved configuration.
pub struct Webpinator<C: ImageCodec> {
    codec: C,
    config: RunConfig,
}

impl<C: ImageCodec> Webpinator<C> {
    pub const fn new(codec: C, config: RunConfig) -> Self {
        Self { codec, config }
    }

    /// Validates, discovers and converts, reporting progress to `observer`.
    pub fn run(&self, observer: &mut dyn RunObserver) -> Result<RunSummary> {
        self.validate_paths()?;
        let images = self.discover()?;
        observer.run_started(&self.config, images.len());
        self.convert_all(&images, observer)
    }

    /// Fails when the input directory or the output directory's parent is
    /// missing. The output directory itself may not exist yet.
    pub fn validate_paths(&self) -> Result<()> {
        let input_dir = &self.config.input_dir;
        if !input_dir.exists() {
            return Err(WebpinatorError::MissingDirectory {
                path: input_dir.clone(),
            });
        }

        if let Some(parent) = self.config.output_dir.parent() {
            if !parent.exists() {
                return Err(WebpinatorError::MissingDirectory {
                    path: parent.to_path_buf(),
                });
            }
        }

        Ok(())
    }

    /// Lists the images to convert; an empty result is an error.
    pub fn discover(&self) -> Result<Vec<DiscoveredImage>> {
        let images = collect_image_files(
            &self.config.input_dir,
            self.config.recursive,
            Some(&self.config.output_dir),
        );

        if images.is_empty() {
            return Err(WebpinatorError::NoImagesFound {
                input_dir: self.config.input_dir.clone(),
            });
        }

        info!(
            "Found {} image files in {}",
            images.len(),
            self.config.input_dir.display()
        );
        Ok(images)
    }

    /// Converts `images` one after another. Per-image failures are recorded,
    /// never returned; only preparing the output directory can fail the run.
    pub fn convert_all(
        &self,
        images: &[DiscoveredImage],
        observer: &mut dyn RunObserver,
    ) -> Result<RunSummary> {
        let output_dir = &self.config.output_dir;
        ensure_output_dir(output_dir)?;

        let mut namer = OutputNamer::from_output_dir(output_dir)?;
        let processor = ImageProcessor::new(&self.codec, output_dir, self.config.quality);
        let mut tracker = ProgressTracker::new(images.len());

        for image in images {
            observer.image_started(image);

            let name = namer.claim(&image.base_name());
            let result = processor.process_image(image, &name);
            if !result.success {
                namer.release(&name);
            }

            observer.image_finished(&result);
            tracker.record(&result);
        }

        let summary = tracker.summary();
        info!("{}", summary);
        Ok(summary)
    }
}

/// Creates the output directory (not its parents) unless it already exists.
fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    match fs::create_dir(output_dir) {
        Ok(()) => {
            debug!("Created output directory {}", output_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && output_dir.is_dir() => Ok(()),
        Err(e) => Err(WebpinatorError::FileSystem {
            path: output_dir.to_path_buf(),
            operation: "create output directory".to_string(),
            source: e,
        }),
    }
}
