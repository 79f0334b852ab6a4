//! # Template Rendering
//!
//! Draws a [`PageRecord`] as a to-scale SVG page, and provides an ASCII preview of a
//! whole page plan for checking a config from the terminal.
//!
//! ## Page Anatomy
//!
//! - Dashed centerline down the middle of the sheet
//! - One-inch calibration mark in the top-left corner, labelled with its pixel size
//! - Tuning echo (EDO, fretboard length, scale length, page number) under the mark
//! - 12-EDO reference frets: thin lines reaching left of center, labelled on the left
//! - Target frets: thick lines reaching right of center, labelled on the right
//! - Tapered necks only: the taper edges, and a short tick at each target fret's
//!   lateral offset, joined into the zig-zag compensation line
//!
//! Sizes below are in inches and scale with the layout's dpi.

use crate::config::{PageLayout, TuningConfig};
use crate::svg::{Stroke, SvgBuilder};
use crate::{PageMode, PageRecord};

// ── Line reach, measured from the centerline ──────────────────────────
const REFERENCE_REACH_LEFT: f64 = 2.0;
const REFERENCE_REACH_RIGHT: f64 = 0.5;
const TARGET_REACH_LEFT: f64 = 0.5;
const TARGET_REACH_RIGHT: f64 = 2.0;
const LABEL_GAP: f64 = 0.06;
const OFFSET_TICK: f64 = 0.12;

// ── Calibration mark & text ───────────────────────────────────────────
const CALIBRATION_WIDTH: f64 = 0.75;
const FONT_SIZE: f64 = 0.13;
const LINE_SPACING: f64 = 0.2;

// ── Strokes (px) ──────────────────────────────────────────────────────
const REFERENCE_STROKE: f64 = 1.0;
const TARGET_STROKE: f64 = 2.0;
const GUIDE_STROKE: f64 = 0.8;

// ── Colors ────────────────────────────────────────────────────────────
const REFERENCE_COLOR: &str = "#cc2222";
const TARGET_COLOR: &str = "#000000";
const CALIBRATION_COLOR: &str = "#22aa22";
const GUIDE_COLOR: &str = "#888888";
const OFFSET_COLOR: &str = "#2255cc";
const TEXT_COLOR: &str = "#1a1a1a";

const CENTERLINE: Stroke = Stroke::dashed(GUIDE_COLOR, GUIDE_STROKE, "6,4");
const TAPER_EDGE: Stroke = Stroke::solid(GUIDE_COLOR, GUIDE_STROKE);
const REFERENCE_LINE: Stroke = Stroke::solid(REFERENCE_COLOR, REFERENCE_STROKE);
const TARGET_LINE: Stroke = Stroke::solid(TARGET_COLOR, TARGET_STROKE);
const CALIBRATION_LINE: Stroke = Stroke::solid(CALIBRATION_COLOR, REFERENCE_STROKE);
const OFFSET_TICK_LINE: Stroke = Stroke::solid(OFFSET_COLOR, TARGET_STROKE);
const OFFSET_CURVE: Stroke = Stroke::solid(OFFSET_COLOR, GUIDE_STROKE);

/// Renders the pages of one template.
pub struct TemplateRenderer<'a> {
    tuning: &'a TuningConfig,
    layout: &'a PageLayout,
    mode: PageMode,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(tuning: &'a TuningConfig, layout: &'a PageLayout, mode: PageMode) -> Self {
        TemplateRenderer {
            tuning,
            layout,
            mode,
        }
    }

    fn px(&self, inches: f64) -> f64 {
        self.layout.to_px(inches)
    }

    /// Sheet height in px: the paper for paginated output, the whole board otherwise.
    pub fn page_height_px(&self) -> f64 {
        match self.mode {
            PageMode::Paginated => self.layout.paper_height_px(),
            PageMode::Single => {
                self.px(self.tuning.fretboard_length()) + 2.0 * self.layout.margin_px()
            }
        }
    }

    /// Render one page as a complete SVG document.
    pub fn render(&self, page: &PageRecord, total_pages: usize) -> String {
        let width = self.layout.paper_width_px();
        let height = self.page_height_px();
        let mut svg = SvgBuilder::new(width, height, self.layout.dpi());

        let center = width / 2.0;
        let top = self.layout.margin_px();
        let y = |position: f64| top + self.px(position);

        let bottom = height - self.layout.margin_px();
        svg.line((center, top), (center, bottom), &CENTERLINE);

        self.draw_calibration(&mut svg, top);
        self.draw_tuning_echo(&mut svg, top, page, total_pages);

        if let Some(taper) = self.tuning.taper() {
            self.draw_taper(&mut svg, page, center, top, taper);
        }

        let font = self.px(FONT_SIZE);
        let gap = self.px(LABEL_GAP);

        for fret in &page.reference_frets {
            let fy = y(fret.position);
            let x_left = center - self.px(REFERENCE_REACH_LEFT);
            let x_right = center + self.px(REFERENCE_REACH_RIGHT);
            svg.line((x_left, fy), (x_right, fy), &REFERENCE_LINE);
            svg.text(
                (x_left - gap, fy + font / 3.0),
                &fret.index.to_string(),
                font,
                REFERENCE_COLOR,
                "end",
            );
        }

        for fret in &page.target_frets {
            let fy = y(fret.position);
            let x_right = center + self.px(TARGET_REACH_RIGHT);
            let x_left = center - self.px(TARGET_REACH_LEFT);
            svg.line((x_left, fy), (x_right, fy), &TARGET_LINE);
            svg.text(
                (x_right + gap, fy + font / 3.0),
                &fret.index.to_string(),
                font,
                TARGET_COLOR,
                "start",
            );
        }

        svg.build()
    }

    fn draw_calibration(&self, svg: &mut SvgBuilder, top: f64) {
        let left = self.layout.margin_px();
        let right = left + self.px(CALIBRATION_WIDTH);
        let inch = self.px(1.0);
        svg.line((left, top), (right, top), &CALIBRATION_LINE);
        svg.line((left, top + inch), (right, top + inch), &CALIBRATION_LINE);
        svg.line((left, top), (left, top + inch), &CALIBRATION_LINE);
        svg.text(
            (left + self.px(LABEL_GAP), top + inch / 2.0),
            &format!("1 inch = {}px", self.layout.dpi()),
            self.px(FONT_SIZE),
            CALIBRATION_COLOR,
            "start",
        );
    }

    fn draw_tuning_echo(
        &self,
        svg: &mut SvgBuilder,
        top: f64,
        page: &PageRecord,
        total_pages: usize,
    ) {
        let left = self.layout.margin_px();
        let mut lines = vec![
            format!("{} EDO", self.tuning.edo()),
            format!("Fretboard length: {} in", self.tuning.fretboard_length()),
            format!("Scale length: {} in", self.tuning.scale_length()),
        ];
        if let Some(taper) = self.tuning.taper() {
            lines.push(format!(
                "Width: {} in to {} in",
                taper.width_at_nut, taper.width_at_heel
            ));
        }
        if total_pages > 1 {
            lines.push(format!("Page {} of {}", page.page_index, total_pages));
            lines.push(format!("Starts {:.3} in from nut", page.origin));
        }

        let first = top + self.px(1.0) + self.px(LINE_SPACING) * 1.5;
        for (n, line) in lines.iter().enumerate() {
            svg.text(
                (left, first + n as f64 * self.px(LINE_SPACING)),
                line,
                self.px(FONT_SIZE),
                TEXT_COLOR,
                "start",
            );
        }
    }

    fn draw_taper(
        &self,
        svg: &mut SvgBuilder,
        page: &PageRecord,
        center: f64,
        top: f64,
        taper: &crate::taper::Taper,
    ) {
        let fretboard_length = self.tuning.fretboard_length();
        let (Some(first), Some(last)) = (page.target_frets.first(), page.target_frets.last())
        else {
            return;
        };

        for side in [-1.0, 1.0] {
            let edge: Vec<(f64, f64)> = [first.position, last.position]
                .iter()
                .map(|&p| {
                    let half = taper.half_width(page.origin + p, fretboard_length);
                    (center + side * self.px(half), top + self.px(p))
                })
                .collect();
            svg.polyline(&edge, &TAPER_EDGE);
        }

        let tick = self.px(OFFSET_TICK) / 2.0;
        let mut curve = Vec::with_capacity(page.target_frets.len());
        for fret in &page.target_frets {
            let x = center + self.px(fret.lateral_offset);
            let fy = top + self.px(fret.position);
            svg.line((x, fy - tick), (x, fy + tick), &OFFSET_TICK_LINE);
            curve.push((x, fy));
        }
        svg.polyline(&curve, &OFFSET_CURVE);
    }
}

/// Rows per inch in the ASCII preview.
const ASCII_ROWS_PER_INCH: usize = 4;

/// Render a page plan as text: one row per quarter inch, reference frets on the
/// left of the bar, target frets on the right.
pub fn draw_ascii(pages: &[PageRecord], tuning: &TuningConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} EDO, scale {} in, fretboard {} in, {} page(s)\n",
        tuning.edo(),
        tuning.scale_length(),
        tuning.fretboard_length(),
        pages.len()
    ));

    let row_height = 1.0 / ASCII_ROWS_PER_INCH as f64;

    for page in pages {
        out.push_str(&format!(
            "\n── Page {} (origin {:.3} in) ──\n",
            page.page_index, page.origin
        ));

        let extent = page
            .target_frets
            .iter()
            .chain(&page.reference_frets)
            .map(|f| f.position)
            .fold(0.0f64, f64::max);
        let rows = (extent / row_height).floor() as usize + 1;

        for row in 0..rows {
            let from = row as f64 * row_height;
            let to = from + row_height;
            let in_row = |frets: &[crate::Fret]| -> Vec<String> {
                frets
                    .iter()
                    .filter(|f| f.position >= from && f.position < to)
                    .map(|f| {
                        if f.lateral_offset != 0.0 {
                            format!("{} ({:+.2})", f.index, f.lateral_offset)
                        } else {
                            f.index.to_string()
                        }
                    })
                    .collect()
            };
            let reference = in_row(&page.reference_frets);
            let target = in_row(&page.target_frets);

            let ruler = if row % ASCII_ROWS_PER_INCH == 0 {
                format!("{:>3}\"", row / ASCII_ROWS_PER_INCH)
            } else {
                String::new()
            };
            let left = if reference.is_empty() {
                String::new()
            } else {
                format!("{} ──", reference.join(","))
            };
            let right = if target.is_empty() {
                String::new()
            } else {
                format!("══ {}", target.join(","))
            };

            let line = format!("{:>4} {:>12}│{}", ruler, left, right);
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out
}
