//! # Fret Template Core Library
//!
//! Computes fret positions for necks tuned to an arbitrary equal division of the
//! octave (EDO) and lays them out as printable, to-scale SVG templates, with the
//! standard 12-EDO frets drawn alongside as a reference.
//!
//! ## Pipeline
//!
//! 1. **Config**: load and validate a [`config::Config`] (tuning + page layout)
//! 2. **Geometry**: generate target and 12-EDO reference [`Fret`]s, with lateral
//!    offsets from the compensation curve when the neck is tapered
//! 3. **Pagination**: cut both sequences into [`PageRecord`]s that fit the paper
//! 4. **Rendering**: draw each page to SVG (or an ASCII preview)
//! 5. **Output**: write every page, replacing pages from earlier runs
//!
//! Two capabilities select the variant: the presence of both width fields enables
//! the tapered model, and [`PageMode`] chooses between one tall page and paper-sized
//! pages.
//!
//! ## Core Types
//!
//! - [`Fret`]: one fret line, identified by its true index
//! - [`PageRecord`]: the frets drawn on one page, rebased to the page origin

pub mod config;
pub mod error;
pub mod geometry;
pub mod output;
pub mod pagination;
pub mod renderer;
mod svg;
pub mod taper;

use config::{PageLayout, TuningConfig};
use error::Result;
use pagination::Paginator;

/// A single fret line.
///
/// # Example
/// ```
/// use fret_template_lib::Fret;
///
/// let octave = Fret { index: 12, position: 12.5, lateral_offset: 0.0 };
/// let on_page_two = octave.rebased(9.0);
/// assert_eq!(on_page_two.index, 12);
/// assert_eq!(on_page_two.position, 3.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fret {
    /// Fret number, 0 at the nut. Never renumbered per page.
    pub index: usize,
    /// Inches from the nut, or from the page origin once rebased
    pub position: f64,
    /// Signed inches from the centerline; 0 on the fixed-width path
    pub lateral_offset: f64,
}

impl Fret {
    /// The same fret measured from `origin` instead of the nut.
    pub fn rebased(&self, origin: f64) -> Fret {
        Fret {
            position: self.position - origin,
            ..*self
        }
    }
}

/// The frets printed on one page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRecord {
    /// 1-based page number
    pub page_index: usize,
    /// Absolute position (inches from the nut) of the page's first target fret
    pub origin: f64,
    /// Target-tuning frets, rebased so the first one sits at 0
    pub target_frets: Vec<Fret>,
    /// 12-EDO frets over the same stretch of neck, same rebasing
    pub reference_frets: Vec<Fret>,
}

/// How the template is split across output files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMode {
    /// One page as tall as the modeled fretboard
    Single,
    /// Paper-sized pages cut from the layout's printable height
    Paginated,
}

/// Compute every page of the template for `tuning`.
pub fn plan_pages(
    tuning: &TuningConfig,
    layout: &PageLayout,
    mode: PageMode,
) -> Result<Vec<PageRecord>> {
    let target = geometry::target_frets(tuning);
    let reference = geometry::reference_frets(tuning);
    tracing::debug!(
        "{} target frets, {} reference frets",
        target.len(),
        reference.len()
    );

    match mode {
        PageMode::Single => Ok(Paginator::single_page(&target, &reference)),
        PageMode::Paginated => Paginator::for_layout(layout).paginate(&target, &reference),
    }
}
