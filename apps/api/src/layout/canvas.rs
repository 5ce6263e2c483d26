//! Page plan: a backend-neutral list of draw operations per page.
//!
//! `Canvas` records drawing calls the way a PDF content stream would receive them.
//! The finished `DocumentPlan` is handed to the PDF writer, and tests inspect it
//! directly instead of parsing PDF bytes.

use serde::Serialize;

use crate::layout::font_metrics::PdfFont;

/// RGB colour, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const GREY: Rgb = Rgb(0.4, 0.4, 0.4);

    pub fn from_u8((r, g, b): (u8, u8, u8)) -> Self {
        Rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

/// One drawing primitive. Coordinates are PDF points from the bottom-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    FilledRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font: PdfFont,
        size: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl Page {
    /// All text drawn on this page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentPlan {
    pub title: String,
    pub width_pt: f32,
    pub height_pt: f32,
    pub pages: Vec<Page>,
}

impl DocumentPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Stateful drawing surface with a current font and fill colour.
pub struct Canvas {
    title: String,
    width_pt: f32,
    height_pt: f32,
    pages: Vec<Page>,
    current: Page,
    font: PdfFont,
    size: f32,
    color: Rgb,
}

impl Canvas {
    pub fn new(title: impl Into<String>, width_pt: f32, height_pt: f32) -> Self {
        Canvas {
            title: title.into(),
            width_pt,
            height_pt,
            pages: Vec::new(),
            current: Page::default(),
            font: PdfFont::Helvetica,
            size: 10.0,
            color: Rgb::BLACK,
        }
    }

    pub fn set_font(&mut self, font: PdfFont, size: f32) {
        self.font = font;
        self.size = size;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn set_fill(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn draw_string(&mut self, x: f32, y: f32, text: impl Into<String>) {
        self.current.ops.push(DrawOp::Text {
            x,
            y,
            text: text.into(),
            font: self.font,
            size: self.size,
            color: self.color,
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.current.ops.push(DrawOp::FilledRect {
            x,
            y,
            width,
            height,
            color: self.color,
        });
    }

    /// Lines are always stroked in black.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.current.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: Rgb::BLACK,
        });
    }

    /// Closes the current page and starts a new, empty one.
    pub fn show_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    /// Closes the last page and returns the plan.
    pub fn finish(mut self) -> DocumentPlan {
        self.show_page();
        DocumentPlan {
            title: self.title,
            width_pt: self.width_pt,
            height_pt: self.height_pt,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_tracks_font_and_colour_per_op() {
        let mut canvas = Canvas::new("t", 100.0, 100.0);
        canvas.set_fill(Rgb::WHITE);
        canvas.set_font(PdfFont::HelveticaBold, 20.0);
        canvas.draw_string(1.0, 2.0, "Title");
        canvas.set_fill(Rgb::BLACK);
        canvas.set_font_size(9.0);
        canvas.draw_string(1.0, 1.0, "body");

        let plan = canvas.finish();
        assert_eq!(plan.page_count(), 1);
        assert_eq!(
            plan.pages[0].ops[0],
            DrawOp::Text {
                x: 1.0,
                y: 2.0,
                text: "Title".to_string(),
                font: PdfFont::HelveticaBold,
                size: 20.0,
                color: Rgb::WHITE,
            }
        );
        match &plan.pages[0].ops[1] {
            DrawOp::Text { font, size, .. } => {
                assert_eq!(*font, PdfFont::HelveticaBold);
                assert_eq!(*size, 9.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_show_page_splits_pages() {
        let mut canvas = Canvas::new("t", 100.0, 100.0);
        canvas.draw_string(0.0, 0.0, "one");
        canvas.show_page();
        canvas.draw_string(0.0, 0.0, "two");
        canvas.line(0.0, 0.0, 10.0, 0.0);
        let plan = canvas.finish();
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.pages[0].texts(), vec!["one"]);
        assert_eq!(plan.pages[1].texts(), vec!["two"]);
        assert_eq!(plan.pages[1].line_count(), 1);
    }

    #[test]
    fn test_rgb_from_u8() {
        let c = Rgb::from_u8((0, 158, 224));
        assert_eq!(c.0, 0.0);
        assert!((c.1 - 158.0 / 255.0).abs() < 1e-6);
    }
}
