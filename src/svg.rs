//! SVG builder: accumulates elements and produces the final document string.
//!
//! All coordinates are device pixels. Width and height are also emitted in inches so
//! the file prints to scale regardless of the viewer's own notion of a pixel.

/// (x, y) in device pixels.
pub(crate) type Point = (f64, f64);

/// Line styling shared by lines and polylines.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stroke {
    color: &'static str,
    width: f64,
    dash: Option<&'static str>,
}

impl Stroke {
    pub(crate) const fn solid(color: &'static str, width: f64) -> Self {
        Stroke {
            color,
            width,
            dash: None,
        }
    }

    pub(crate) const fn dashed(color: &'static str, width: f64, dash: &'static str) -> Self {
        Stroke {
            color,
            width,
            dash: Some(dash),
        }
    }

    fn attributes(&self) -> String {
        let mut attrs = format!(r#"stroke="{}" stroke-width="{:.1}""#, self.color, self.width);
        if let Some(dash) = self.dash {
            attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dash));
        }
        attrs
    }
}

pub(crate) struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
    dpi: f64,
}

impl SvgBuilder {
    pub(crate) fn new(width: f64, height: f64, dpi: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            dpi,
        }
    }

    pub(crate) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.1} {:.1}" width="{:.4}in" height="{:.4}in" style="font-family: 'Helvetica', 'Arial', sans-serif;">"#,
            self.width,
            self.height,
            self.width / self.dpi,
            self.height / self.dpi
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub(crate) fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.elements.push(format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            stroke.attributes()
        ));
    }

    pub(crate) fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        let coords: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect();
        self.elements.push(format!(
            r#"<polyline points="{}" fill="none" {}/>"#,
            coords.join(" "),
            stroke.attributes()
        ));
    }

    pub(crate) fn text(&mut self, at: Point, content: &str, size: f64, fill: &str, anchor: &str) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}" text-anchor="{}">{}</text>"#,
            at.0,
            at.1,
            size,
            fill,
            anchor,
            escape(content)
        ));
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
