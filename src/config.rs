use clap::{ArgAction, Parser};
use std::fmt;
use std::path::{Path, PathBuf};

/// Raw command line options, before defaults are applied.
#[derive(Parser, Clone, Debug, Default)]
#[command(
    name = "webpinator",
    version,
    about = "A CLI tool to convert a directory of image files to WEBP.",
    long_about = None
)]
pub struct Config {
    /// The input directory (defaults to current working directory)
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// The output directory (defaults to `[input dir]/output`)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// The resulting quality of the WEBP file. Can be 1-101, and defaults to `101` (special value meaning lossless).
    #[arg(short, long, value_name = "1-101", allow_hyphen_values = true)]
    pub quality: Option<String>,

    /// Whether to also convert the files in any sub-folders
    #[arg(short, long)]
    pub recursive: bool,

    /// Print diagnostic logs (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// WEBP encoding quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Lossless,
    /// Lossy quality in `1..=100`.
    Lossy(u8),
}

impl Quality {
    pub const LOSSLESS_SENTINEL: u8 = 101;

    /// Maps `1..=100` to lossy and `101` to lossless.
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1..=100 => Some(Self::Lossy(value)),
            Self::LOSSLESS_SENTINEL => Some(Self::Lossless),
            _ => None,
        }
    }

    /// Parses a user-supplied quality from its leading integer, so `"75.5"`
    /// and `"80%"` read as 75 and 80. Anything without one, or out of range,
    /// degrades to lossless; the rejected input is handed back so the caller
    /// can mention it. An empty value counts as absent.
    pub fn resolve(raw: Option<&str>) -> (Self, Option<QualityFallback>) {
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return (Self::Lossless, None);
        };

        let parsed = leading_integer(raw)
            .and_then(|value| u8::try_from(value).ok())
            .and_then(Self::from_value);

        match parsed {
            Some(quality) => (quality, None),
            None => (
                Self::Lossless,
                Some(QualityFallback {
                    raw: raw.to_string(),
                }),
            ),
        }
    }
}

/// Reads an optionally signed integer from the start of `raw`, ignoring
/// leading whitespace and anything after the digits. A `0x` prefix switches to
/// hexadecimal. Returns `None` when no digit follows the sign.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, body) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let digits_end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    let digits = &body[..digits_end];
    if digits.is_empty() {
        return None;
    }

    // too many digits for i64 is out of range either way
    let magnitude = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lossless => f.write_str("lossless"),
            Self::Lossy(value) => write!(f, "{}", value),
        }
    }
}

/// A quality value that was replaced by the lossless default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityFallback {
    pub raw: String,
}

impl fmt::Display for QualityFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" is not a valid quality (1-101), falling back to lossless",
            self.raw
        )
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub quality: Quality,
    pub recursive: bool,
}

impl RunConfig {
    pub const DEFAULT_OUTPUT_DIR_NAME: &'static str = "output";

    /// Applies defaults to the raw options. Relative paths are anchored at
    /// `cwd`, so the result does not depend on process state.
    pub fn resolve(args: &Config, cwd: &Path) -> (Self, Option<QualityFallback>) {
        let input_dir = non_empty(args.input.as_deref())
            .map(|input| cwd.join(input))
            .unwrap_or_else(|| cwd.to_path_buf());
        let output_dir = non_empty(args.output.as_deref())
            .map(|output| cwd.join(output))
            .unwrap_or_else(|| input_dir.join(Self::DEFAULT_OUTPUT_DIR_NAME));
        let (quality, fallback) = Quality::resolve(args.quality.as_deref());

        let config = Self {
            input_dir,
            output_dir,
            quality,
            recursive: args.recursive,
        };
        (config, fallback)
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
