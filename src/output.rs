//! # Template Output
//!
//! Decides where pages go and writes them.
//!
//! ## Naming
//!
//! Files are named from the config file's stem: `19edo.json` produces `19edo.svg` in
//! single-page mode and `19edo_page1.svg`, `19edo_page2.svg`, … when paginated. The
//! default directory is `<config dir>/<stem>_frets`.
//!
//! ## Run Semantics
//!
//! - Every page is rendered in memory before anything touches the disk
//! - Pages left by an earlier run with the same stem are removed first, so a shorter
//!   run never leaves stale trailing pages behind
//! - If a write fails, the pages already written by this run are removed again

use crate::config::Config;
use crate::error::{FretError, Result};
use crate::renderer::TemplateRenderer;
use crate::{plan_pages, PageMode};
use std::fs;
use std::path::{Path, PathBuf};

/// Output directory and file stem for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    dir: PathBuf,
    stem: String,
}

impl OutputPlan {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        OutputPlan {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    /// Derive the plan from the config path; `out_dir` replaces the default directory.
    pub fn for_config(config_path: &Path, out_dir: Option<&Path>) -> Result<Self> {
        let stem = config_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                FretError::Config(format!(
                    "cannot derive an output name from '{}'",
                    config_path.display()
                ))
            })?;

        let dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => config_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(format!("{}_frets", stem)),
        };

        Ok(OutputPlan::new(dir, stem))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn file_name(&self, page_index: usize, mode: PageMode) -> String {
        match mode {
            PageMode::Single => format!("{}.svg", self.stem),
            PageMode::Paginated => format!("{}_page{}.svg", self.stem, page_index),
        }
    }

    pub fn page_path(&self, page_index: usize, mode: PageMode) -> PathBuf {
        self.dir.join(self.file_name(page_index, mode))
    }

    /// True for any file name this plan could have produced, in either mode.
    fn owns(&self, file_name: &str) -> bool {
        let Some(base) = file_name.strip_suffix(".svg") else {
            return false;
        };
        if base == self.stem {
            return true;
        }
        base.strip_prefix(&self.stem)
            .and_then(|rest| rest.strip_prefix("_page"))
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Remove pages a previous run wrote for this stem. Returns how many were removed.
    pub fn clean_stale(&self) -> Result<usize> {
        if !self.dir.is_dir() {
            return Ok(0);
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| FretError::io(&self.dir, e))?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| FretError::io(&self.dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if self.owns(name) && entry.path().is_file() {
                fs::remove_file(entry.path()).map_err(|e| FretError::io(entry.path(), e))?;
                tracing::debug!("Removed stale page {}", entry.path().display());
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Write rendered pages (page index, SVG) into the output directory.
    pub fn write_pages(&self, pages: &[(usize, String)], mode: PageMode) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|e| FretError::io(&self.dir, e))?;

        let mut written: Vec<PathBuf> = Vec::with_capacity(pages.len());
        for (page_index, svg) in pages {
            let path = self.page_path(*page_index, mode);
            if let Err(e) = fs::write(&path, svg) {
                for done in &written {
                    if let Err(cleanup) = fs::remove_file(done) {
                        tracing::warn!(
                            "Could not remove partial output {}: {}",
                            done.display(),
                            cleanup
                        );
                    }
                }
                return Err(FretError::io(&path, e));
            }
            written.push(path);
        }
        Ok(written)
    }
}

/// Plan, render and write every page of `config`. Returns the written paths in page order.
pub fn generate(config: &Config, mode: PageMode, plan: &OutputPlan) -> Result<Vec<PathBuf>> {
    let pages = plan_pages(&config.tuning, &config.layout, mode)?;
    let renderer = TemplateRenderer::new(&config.tuning, &config.layout, mode);
    let rendered: Vec<(usize, String)> = pages
        .iter()
        .map(|page| (page.page_index, renderer.render(page, pages.len())))
        .collect();

    let removed = plan.clean_stale()?;
    if removed > 0 {
        tracing::info!(
            "Removed {} page(s) from a previous run in {}",
            removed,
            plan.dir().display()
        );
    }

    let written = plan.write_pages(&rendered, mode)?;
    tracing::info!(
        "Wrote {} page(s) to {}",
        written.len(),
        plan.dir().display()
    );
    Ok(written)
}
