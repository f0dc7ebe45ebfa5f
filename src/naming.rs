use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{Result, WebpinatorError};

pub const WEBP_EXTENSION: &str = "webp";

/// Hands out collision-free output names for one run.
///
/// Seeded with every `*.webp` already present in the output directory; after
/// that the filesystem is not consulted again, so names claimed earlier in the
/// run are honoured even before their files exist.
#[derive(Debug, Default)]
pub struct OutputNamer {
    claimed: HashSet<String>,
}

impl OutputNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the namer from `output_dir`. A missing directory is empty.
    pub fn from_output_dir(output_dir: &Path) -> Result<Self> {
        let entries = match fs::read_dir(output_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(WebpinatorError::FileSystem {
                    path: output_dir.to_path_buf(),
                    operation: "read output directory".to_string(),
                    source: e,
                })
            }
        };

        let mut namer = Self::new();
        for entry in entries {
            let entry = entry.map_err(|e| WebpinatorError::FileSystem {
                path: output_dir.to_path_buf(),
                operation: "read output directory".to_string(),
                source: e,
            })?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(stem) = file_name.strip_suffix(".webp") {
                namer.claimed.insert(stem.to_string());
            }
        }
        Ok(namer)
    }

    /// Claims `base`, or `base-1`, `base-2`, ... whichever is free first.
    pub fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut copy = 1u64;
        while self.claimed.contains(&candidate) {
            candidate = format!("{}-{}", base, copy);
            copy += 1;
        }
        self.claimed.insert(candidate.clone());
        candidate
    }

    /// Returns a name whose output was never written.
    pub fn release(&mut self, name: &str) {
        self.claimed.remove(name);
    }
}

/// `<output_dir>/<name>.webp`
pub fn output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", name, WEBP_EXTENSION))
}
