//! File naming inside the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OutputError, Result};

/// Name of the batch aggregate document.
pub const AGGREGATE_FILENAME: &str = "forms_data.json";

/// `cms1500_form_0007` for form 7.
pub fn form_stem(form_number: u32) -> String {
    format!("cms1500_form_{form_number:04}")
}

/// File names (not paths) belonging to one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFiles {
    pub form_number: u32,
    pub pdf: String,
    pub png: String,
    pub json: String,
    pub core_json: String,
}

impl FormFiles {
    pub fn new(form_number: u32) -> Self {
        let stem = form_stem(form_number);
        Self {
            form_number,
            pdf: format!("{stem}.pdf"),
            png: format!("{stem}.png"),
            json: format!("{stem}.json"),
            core_json: format!("{stem}_core.json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| OutputError::Io {
            operation: "create directory",
            path: self.dir.clone(),
            source,
        })
    }

    pub fn files(&self, form_number: u32) -> FormFiles {
        FormFiles::new(form_number)
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.dir.join(AGGREGATE_FILENAME)
    }
}
