//! Writes a `DocumentPlan` as PDF bytes using the built-in Helvetica faces.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
};
use thiserror::Error;

use crate::layout::{DocumentPlan, DrawOp, PdfFont, Rgb};

#[derive(Debug, Error)]
#[error("PDF backend error: {0}")]
pub struct PdfWriteError(#[from] printpdf::Error);

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.0, rgb.1, rgb.2, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: PdfFont) -> &IndirectFontRef {
        match font {
            PdfFont::Helvetica => &self.regular,
            PdfFont::HelveticaBold => &self.bold,
        }
    }
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::FilledRect {
            x,
            y,
            width,
            height,
            color: c,
        } => {
            layer.set_fill_color(color(*c));
            layer.add_rect(Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height)));
        }
        DrawOp::Text {
            x,
            y,
            text,
            font,
            size,
            color: c,
        } => {
            layer.set_fill_color(color(*c));
            layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.get(*font));
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: c,
        } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(1.0);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(*x1), mm(*y1)), false),
                    (Point::new(mm(*x2), mm(*y2)), false),
                ],
                is_closed: false,
            });
        }
    }
}

/// Serializes the plan, one PDF page per plan page.
pub fn write_pdf(plan: &DocumentPlan) -> Result<Vec<u8>, PdfWriteError> {
    let (width, height) = (mm(plan.width_pt), mm(plan.height_pt));
    let (doc, first_page, first_layer) = PdfDocument::new(&plan.title, width, height, "Content");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in plan.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, "Content");
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    Ok(doc.save_to_bytes()?)
}
