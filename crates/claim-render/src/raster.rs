//! First-page previews.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{RenderError, Result};

pub trait Rasterizer {
    /// Render page one of `pdf` to a PNG at `image`.
    fn first_page_to_image(&self, pdf: &Path, image: &Path, dpi: u32) -> Result<()>;
}

/// Shells out to poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: PathBuf,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdftoppm"),
        }
    }
}

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn failure(&self, reason: impl Into<String>) -> RenderError {
        RenderError::Rasterize {
            program: self.program.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn first_page_to_image(&self, pdf: &Path, image: &Path, dpi: u32) -> Result<()> {
        // pdftoppm appends the extension itself.
        let stem = image.with_extension("");
        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .args(["-f", "1", "-l", "1", "-singlefile"])
            .arg(pdf)
            .arg(&stem)
            .output()
            .map_err(|error| self.failure(error.to_string()))?;
        if !output.status.success() {
            return Err(self.failure(String::from_utf8_lossy(&output.stderr).trim()));
        }

        let produced = stem.with_extension("png");
        if produced != image {
            fs::rename(&produced, image).map_err(|source| RenderError::Io {
                operation: "rename",
                path: produced.clone(),
                source,
            })?;
        }
        if !image.is_file() {
            return Err(self.failure("no image was produced"));
        }
        debug!(image = %image.display(), dpi, "rasterized first page");
        Ok(())
    }
}

/// Preview path, or `None` with a warning when rasterization fails.
pub fn render_preview<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    pdf: &Path,
    image: &Path,
    dpi: u32,
) -> Option<PathBuf> {
    match rasterizer.first_page_to_image(pdf, image, dpi) {
        Ok(()) => Some(image.to_path_buf()),
        Err(error) => {
            warn!(pdf = %pdf.display(), error = %error, "preview image not created");
            None
        }
    }
}
