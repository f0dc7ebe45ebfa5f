use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use webpinator::mocks::MockCodec;
use webpinator::{
    Config, ConversionResult, DiscoveredImage, Quality, RunConfig, RunObserver, RunSummary,
    SilentObserver, WebpCodec, Webpinator, WebpinatorError,
};

/// Observer that keeps everything it is told.
#[derive(Default)]
struct RecordingObserver {
    image_count: Option<usize>,
    started: Vec<PathBuf>,
    finished: Vec<ConversionResult>,
}

impl RunObserver for RecordingObserver {
    fn run_started(&mut self, _config: &RunConfig, image_count: usize) {
        self.image_count = Some(image_count);
    }

    fn image_started(&mut self, image: &DiscoveredImage) {
        self.started.push(image.path.clone());
    }

    fn image_finished(&mut self, result: &ConversionResult) {
        self.finished.push(result.clone());
    }
}

fn resolve(cwd: &Path, args: Config) -> RunConfig {
    RunConfig::resolve(&args, cwd).0
}

fn save_png(path: &Path) {
    RgbaImage::from_pixel(8, 8, Rgba([20, 40, 60, 255]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn save_jpg(path: &Path) {
    RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]))
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

fn webp_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".webp"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_end_to_end_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path();
    save_png(&input_dir.join("a.png"));
    save_jpg(&input_dir.join("b.jpg"));
    fs::write(input_dir.join("notes.txt"), b"not an image").unwrap();

    let config = resolve(input_dir, Config::default());
    let summary = Webpinator::new(WebpCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap();

    assert_eq!(summary, RunSummary { converted: 2, total: 2 });
    assert_eq!(summary.to_string(), "Successfully converted 2 out of 2 files.");
    assert_eq!(
        webp_files(&input_dir.join("output")),
        vec!["a.webp", "b.webp"]
    );

    let decoded = image::open(input_dir.join("output/a.webp")).unwrap();
    assert_eq!(decoded.dimensions(), (8, 8));
}

#[test]
fn test_empty_input_dir_fails_without_writes() {
    let temp_dir = TempDir::new().unwrap();

    let config = resolve(temp_dir.path(), Config::default());
    let err = Webpinator::new(WebpCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap_err();

    assert!(matches!(err, WebpinatorError::NoImagesFound { .. }));
    assert!(err.is_fatal());
    assert!(!temp_dir.path().join("output").exists());
}

#[test]
fn test_missing_input_dir_fails() {
    let temp_dir = TempDir::new().unwrap();
    let args = Config {
        input: Some("does-not-exist".into()),
        ..Config::default()
    };

    let config = resolve(temp_dir.path(), args);
    let err = Webpinator::new(MockCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap_err();

    assert!(matches!(err, WebpinatorError::MissingDirectory { .. }));
    assert_eq!(
        err.to_string(),
        "The input or (parent of) output directory doesn't exist."
    );
}

#[test]
fn test_missing_output_parent_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.png"), b"").unwrap();
    let args = Config {
        output: Some("nowhere/output".into()),
        ..Config::default()
    };

    let config = resolve(temp_dir.path(), args);
    let err = Webpinator::new(MockCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap_err();

    assert!(matches!(err, WebpinatorError::MissingDirectory { .. }));
    assert!(!temp_dir.path().join("nowhere").exists());
}

#[test]
fn test_failures_do_not_abort_the_run() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["one.png", "two-broken.png", "three.png"] {
        fs::write(temp_dir.path().join(name), b"").unwrap();
    }

    let config = resolve(temp_dir.path(), Config::default());
    let mut observer = RecordingObserver::default();
    let summary = Webpinator::new(MockCodec::failing_on("broken"), config)
        .run(&mut observer)
        .unwrap();

    assert_eq!(summary, RunSummary { converted: 2, total: 3 });
    assert_eq!(observer.image_count, Some(3));
    assert_eq!(observer.started.len(), 3);

    let failed: Vec<_> = observer.finished.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].file_name(), "two-broken.png");
    assert!(failed[0].error.as_deref().unwrap().contains("mock decode failure"));

    // reported count matches files actually written
    assert_eq!(
        webp_files(&temp_dir.path().join("output")),
        vec!["one.webp", "three.webp"]
    );
}

#[test]
fn test_existing_outputs_get_suffixes() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("output");
    fs::create_dir(&output_dir).unwrap();
    fs::write(output_dir.join("photo.webp"), b"old").unwrap();
    fs::write(output_dir.join("photo-1.webp"), b"old").unwrap();
    fs::write(temp_dir.path().join("photo.png"), b"").unwrap();

    let config = resolve(temp_dir.path(), Config::default());
    let summary = Webpinator::new(MockCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(fs::read(output_dir.join("photo.webp")).unwrap(), b"old");
    assert_eq!(fs::read(output_dir.join("photo-2.webp")).unwrap(), MockCodec::OUTPUT);
}

#[test]
fn test_recursive_collisions_are_flattened() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    fs::create_dir_all(input_dir.join("nested")).unwrap();
    fs::write(input_dir.join("a.png"), b"").unwrap();
    fs::write(input_dir.join("a.jpg"), b"").unwrap();
    fs::write(input_dir.join("nested/a.gif"), b"").unwrap();

    let args = Config {
        input: Some(input_dir.clone()),
        output: Some(temp_dir.path().join("flat")),
        recursive: true,
        ..Config::default()
    };
    let config = resolve(temp_dir.path(), args);
    let summary = Webpinator::new(MockCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap();

    assert_eq!(summary, RunSummary { converted: 3, total: 3 });
    assert_eq!(
        webp_files(&temp_dir.path().join("flat")),
        vec!["a-1.webp", "a-2.webp", "a.webp"]
    );
}

#[test]
fn test_non_recursive_ignores_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("nested")).unwrap();
    fs::write(temp_dir.path().join("nested/deep.png"), b"").unwrap();

    let config = resolve(temp_dir.path(), Config::default());
    let err = Webpinator::new(MockCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap_err();

    assert!(matches!(err, WebpinatorError::NoImagesFound { .. }));
}

#[test]
fn test_previous_output_is_not_reconverted() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.png"), b"").unwrap();
    let args = Config {
        recursive: true,
        ..Config::default()
    };

    for _ in 0..2 {
        let config = resolve(temp_dir.path(), args.clone());
        let summary = Webpinator::new(MockCodec::new(), config)
            .run(&mut SilentObserver)
            .unwrap();
        assert_eq!(summary.total, 1);
    }

    assert_eq!(
        webp_files(&temp_dir.path().join("output")),
        vec!["a-1.webp", "a.webp"]
    );
}

#[test]
fn test_lossy_quality_and_trim_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let mut framed = RgbaImage::from_pixel(30, 20, Rgba([0, 0, 0, 0]));
    for y in 5..15 {
        for x in 10..22 {
            framed.put_pixel(x, y, Rgba([250, 250, 0, 255]));
        }
    }
    DynamicImage::ImageRgba8(framed)
        .save_with_format(temp_dir.path().join("framed.png"), ImageFormat::Png)
        .unwrap();

    let args = Config {
        quality: Some("50".to_string()),
        ..Config::default()
    };
    let config = resolve(temp_dir.path(), args);
    assert_eq!(config.quality, Quality::Lossy(50));

    let summary = Webpinator::new(WebpCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap();
    assert_eq!(summary.converted, 1);

    let decoded = image::open(temp_dir.path().join("output/framed.webp")).unwrap();
    assert_eq!(decoded.dimensions(), (12, 10));
}

#[test]
fn test_undecodable_image_is_counted_as_failure() {
    let temp_dir = TempDir::new().unwrap();
    save_png(&temp_dir.path().join("good.png"));
    fs::write(temp_dir.path().join("bad.png"), b"garbage").unwrap();

    let config = resolve(temp_dir.path(), Config::default());
    let summary = Webpinator::new(WebpCodec::new(), config)
        .run(&mut SilentObserver)
        .unwrap();

    assert_eq!(summary, RunSummary { converted: 1, total: 2 });
    assert_eq!(webp_files(&temp_dir.path().join("output")), vec!["good.webp"]);
}
