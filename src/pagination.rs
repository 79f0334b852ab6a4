//! # Page Splitting
//!
//! A full-size fret template is usually longer than a sheet of paper. This module cuts
//! the target fret sequence into page-sized runs and keeps the 12-EDO reference lines
//! aligned with the same cut points.
//!
//! ## Cutting Rules
//!
//! - A fret fits on a page when its rebased position, in device pixels, is strictly
//!   below the printable page height.
//! - The last target fret that fits becomes the origin of the next page. It is drawn
//!   twice (bottom of one page, top of the next) so sheets can be lined up and taped.
//! - Reference frets are rebased by the same cut; any at or before the cut belong to
//!   the previous page and are dropped.
//! - Fret indices are carried through untouched, so labels stay the true fret number.
//!
//! Progress requires every consecutive target spacing to fit on a page. That is
//! checked up front and reported as a configuration error.

use crate::config::PageLayout;
use crate::error::{FretError, Result};
use crate::{Fret, PageRecord};

/// Splits fret sequences into pages of a fixed printable height.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_height_px: f64,
    dpi: f64,
}

impl Paginator {
    pub fn new(page_height_px: f64, dpi: f64) -> Self {
        Paginator {
            page_height_px,
            dpi,
        }
    }

    /// Paginator for the printable area of `layout`.
    pub fn for_layout(layout: &PageLayout) -> Self {
        Paginator::new(layout.printable_height_px(), layout.dpi())
    }

    fn fits(&self, rebased_position: f64) -> bool {
        rebased_position * self.dpi < self.page_height_px
    }

    /// Reject page heights that cannot hold two consecutive target frets.
    ///
    /// Fret spacing shrinks toward the bridge, so in practice this is decided by the
    /// gap between the nut and fret 1.
    pub fn check_progress(&self, target: &[Fret]) -> Result<()> {
        if !(self.page_height_px.is_finite() && self.page_height_px > 0.0) {
            return Err(FretError::invalid(
                "page_height",
                format!("must be a positive number of pixels, got {}", self.page_height_px),
            ));
        }
        for pair in target.windows(2) {
            let spacing = pair[1].position - pair[0].position;
            if !self.fits(spacing) {
                return Err(FretError::invalid(
                    "page_height",
                    format!(
                        "{:.1}px page cannot hold the {:.3} in spacing between frets {} and {}",
                        self.page_height_px, spacing, pair[0].index, pair[1].index
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Cut `target` and `reference` (both absolute, increasing) into rebased pages.
    pub fn paginate(&self, target: &[Fret], reference: &[Fret]) -> Result<Vec<PageRecord>> {
        if target.is_empty() {
            return Err(FretError::Config("no target frets to paginate".to_string()));
        }
        self.check_progress(target)?;

        let mut pages = Vec::new();
        let mut start = 0;
        let mut reference_start = 0;

        loop {
            let origin = target[start].position;

            let remaining = &target[start..];
            let i = remaining
                .iter()
                .take_while(|f| self.fits(f.position - origin))
                .count();

            let baseline = &reference[reference_start..];
            let j = baseline
                .iter()
                .take_while(|f| self.fits(f.position - origin))
                .count();

            let page = PageRecord {
                page_index: pages.len() + 1,
                origin,
                target_frets: remaining[..i].iter().map(|f| f.rebased(origin)).collect(),
                reference_frets: baseline[..j].iter().map(|f| f.rebased(origin)).collect(),
            };
            tracing::debug!(
                "Page {}: target frets {}..={}, {} reference frets, origin {:.4} in",
                page.page_index,
                remaining[0].index,
                remaining[i - 1].index,
                j,
                origin
            );
            pages.push(page);

            if start + i == target.len() {
                break;
            }

            // The last fret that fit becomes the next page's origin
            start += i - 1;
            let cut = target[start].position;
            reference_start += baseline.partition_point(|f| f.position - cut <= 0.0);
        }

        Ok(pages)
    }

    /// Everything on one page, with no height limit.
    pub fn single_page(target: &[Fret], reference: &[Fret]) -> Vec<PageRecord> {
        vec![PageRecord {
            page_index: 1,
            origin: 0.0,
            target_frets: target.to_vec(),
            reference_frets: reference.to_vec(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningConfig;
    use crate::geometry::{reference_frets, target_frets};

    fn frets(positions: &[f64]) -> Vec<Fret> {
        positions
            .iter()
            .enumerate()
            .map(|(index, &position)| Fret {
                index,
                position,
                lateral_offset: 0.0,
            })
            .collect()
    }

    /// Undo rebasing and drop the duplicated cut fret at the top of each later page.
    fn reassemble(pages: &[PageRecord]) -> Vec<Fret> {
        let mut out: Vec<Fret> = Vec::new();
        for (n, page) in pages.iter().enumerate() {
            let skip = if n == 0 { 0 } else { 1 };
            out.extend(
                page.target_frets
                    .iter()
                    .skip(skip)
                    .map(|f| f.rebased(-page.origin)),
            );
        }
        out
    }

    #[test]
    fn test_everything_fits_on_one_page() {
        let target = frets(&[0.0, 1.0, 2.0, 3.0]);
        let reference = frets(&[0.0, 1.5, 3.0]);
        let pages = Paginator::new(1000.0, 100.0).paginate(&target, &reference).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_index, 1);
        assert_eq!(pages[0].target_frets, target);
        assert_eq!(pages[0].reference_frets, reference);
    }

    #[test]
    fn test_cut_fret_starts_next_page() {
        let target = frets(&[0.0, 3.0, 6.0, 9.0, 12.0]);
        let reference = frets(&[0.0, 2.0, 4.0, 7.0, 10.0, 11.0]);
        // 10 inches per page at 1 dpi
        let pages = Paginator::new(10.0, 1.0).paginate(&target, &reference).unwrap();
        assert_eq!(pages.len(), 2);

        let first: Vec<usize> = pages[0].target_frets.iter().map(|f| f.index).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        let second = &pages[1];
        assert_eq!(second.origin, 9.0);
        assert_eq!(second.target_frets[0].index, 3);
        assert_eq!(second.target_frets[0].position, 0.0);
        assert_eq!(second.target_frets[1].position, 3.0);

        // Reference frets at or before the cut are dropped; later ones are rebased
        let refs: Vec<(usize, f64)> = second
            .reference_frets
            .iter()
            .map(|f| (f.index, f.position))
            .collect();
        assert_eq!(refs, vec![(4, 1.0), (5, 2.0)]);
    }

    #[test]
    fn test_reference_between_cut_and_page_end_is_repeated() {
        let target = frets(&[0.0, 4.0, 8.0, 12.0]);
        let reference = frets(&[0.0, 9.0, 13.0]);
        let pages = Paginator::new(10.0, 1.0).paginate(&target, &reference).unwrap();
        assert_eq!(pages.len(), 2);
        // Reference fret 1 sits below the cut at 8.0 on page one and reappears on page two
        assert!(pages[0].reference_frets.iter().any(|f| f.index == 1));
        assert!(pages[1].reference_frets.iter().any(|f| f.index == 1));
        assert!(pages[1].reference_frets.iter().all(|f| f.position > 0.0));
    }

    #[test]
    fn test_positions_stay_below_page_height() {
        let tuning = TuningConfig::new(19.0, 25.0, 18.375, None).unwrap();
        let target = target_frets(&tuning);
        let reference = reference_frets(&tuning);
        let paginator = Paginator::new(500.0, 108.0);
        let pages = paginator.paginate(&target, &reference).unwrap();
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.target_frets.is_empty());
            assert_eq!(page.target_frets[0].position, 0.0);
            for fret in page.target_frets.iter().chain(&page.reference_frets) {
                assert!(fret.position * 108.0 < 500.0);
                assert!(fret.position >= 0.0);
            }
        }
    }

    #[test]
    fn test_round_trip_reconstructs_target() {
        let tuning = TuningConfig::new(31.0, 25.5, 19.0, None).unwrap();
        let target = target_frets(&tuning);
        let reference = reference_frets(&tuning);
        for height in [250.0, 400.0, 777.0, 1080.0, 5000.0] {
            let pages = Paginator::new(height, 108.0)
                .paginate(&target, &reference)
                .unwrap();
            let rebuilt = reassemble(&pages);
            assert_eq!(rebuilt.len(), target.len(), "height {}", height);
            for (a, b) in rebuilt.iter().zip(&target) {
                assert_eq!(a.index, b.index);
                assert!((a.position - b.position).abs() < 1e-9);
            }
            for pair in pages.windows(2) {
                let last = pair[0].target_frets.last().unwrap();
                let first = &pair[1].target_frets[0];
                assert_eq!(last.index, first.index);
            }
        }
    }

    #[test]
    fn test_page_indices_are_one_based_and_sequential() {
        let target = frets(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let pages = Paginator::new(2.5, 1.0).paginate(&target, &[]).unwrap();
        let indices: Vec<usize> = pages.iter().map(|p| p.page_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(pages.iter().all(|p| p.reference_frets.is_empty()));
    }

    #[test]
    fn test_degenerate_page_height_rejected() {
        let tuning = TuningConfig::new(12.0, 25.0, 18.375, None).unwrap();
        let target = target_frets(&tuning);
        // Fret 1 sits about 1.4 in from the nut
        let err = Paginator::new(100.0, 108.0)
            .paginate(&target, &reference_frets(&tuning))
            .unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.field(), Some("page_height"));
    }

    #[test]
    fn test_spacing_equal_to_page_height_rejected() {
        let target = frets(&[0.0, 2.0, 3.0]);
        assert!(Paginator::new(2.0, 1.0).check_progress(&target).is_err());
        assert!(Paginator::new(2.01, 1.0).check_progress(&target).is_ok());
    }

    #[test]
    fn test_zero_page_height_rejected() {
        let target = frets(&[0.0]);
        let err = Paginator::new(0.0, 108.0).paginate(&target, &[]).unwrap_err();
        assert_eq!(err.field(), Some("page_height"));
    }

    #[test]
    fn test_nut_only_target_is_one_page() {
        let target = frets(&[0.0]);
        let pages = Paginator::new(10.0, 1.0).paginate(&target, &[]).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].target_frets.len(), 1);
    }

    #[test]
    fn test_single_page_keeps_everything() {
        let target = frets(&[0.0, 5.0, 50.0]);
        let pages = Paginator::single_page(&target, &[]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].target_frets, target);
        assert_eq!(pages[0].origin, 0.0);
    }
}
