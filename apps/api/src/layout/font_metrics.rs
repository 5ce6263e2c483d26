//! Static font-metric tables for the PDF base-14 Helvetica faces.
//!
//! Character widths are in em units (relative to font size), taken from the Adobe
//! AFM files for Helvetica and Helvetica-Bold. The PDF viewer renders the built-in
//! fonts with exactly these advances, so greedy wrapping measured here matches what
//! ends up on paper.
//!
//! The main table covers ASCII 0x20..=0x7E (95 printable characters),
//! index = (char as usize) - 32. A short list of Latin-1 letters (German umlauts,
//! common accents) is looked up separately; anything else falls back to
//! `average_char_width`.

use serde::{Deserialize, Serialize};

/// Points per centimetre.
pub const CM: f32 = 72.0 / 2.54;

// ────────────────────────────────────────────────────────────────────────────
// Font enum
// ────────────────────────────────────────────────────────────────────────────

/// The built-in fonts used by the review document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfFont {
    /// Body text.
    Helvetica,
    /// Banner title and section headings.
    HelveticaBold,
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry for the review document. All lengths are in PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    /// Height of the coloured banner at the top of the first page.
    pub banner_height_pt: f32,
    /// RGB, 0–255.
    pub banner_color: (u8, u8, u8),
    pub banner_subtitle: String,
    /// Left edge for headings and identity blocks.
    pub margin_left_pt: f32,
    /// Left edge for wrapped free text.
    pub text_indent_pt: f32,
    /// Maximum width of a wrapped free-text line.
    pub content_width_pt: f32,
    /// Cursor position after a page break.
    pub top_content_pt: f32,
    /// Cursor position where page one's content starts, below the banner.
    pub first_content_pt: f32,
    /// A sub-line is never drawn below this height; the page breaks first.
    pub min_bottom_pt: f32,
    /// The development section starts on a fresh page when the cursor is lower than this.
    pub section_break_pt: f32,
    pub body_font_size: f32,
    pub line_height_pt: f32,
    /// How many newline-delimited lines of goals are considered.
    pub goals_max_lines: usize,
    /// How many newline-delimited lines of development notes are considered.
    pub development_max_lines: usize,
}

/// Returns the default page config: ISO A4 portrait, 2 cm side margins, 3 cm banner.
///
/// content_width = 21.0cm − 4cm ≈ 481.9pt.
pub fn default_page_config() -> PageConfig {
    let width_pt = 595.2756;
    let height_pt = 841.8898;
    PageConfig {
        width_pt,
        height_pt,
        banner_height_pt: 3.0 * CM,
        banner_color: (0, 158, 224),
        banner_subtitle: "Annual employee review".to_string(),
        margin_left_pt: 2.0 * CM,
        text_indent_pt: 2.5 * CM,
        content_width_pt: width_pt - 4.0 * CM,
        top_content_pt: height_pt - 3.0 * CM,
        first_content_pt: height_pt - 5.0 * CM,
        min_bottom_pt: 8.0 * CM,
        section_break_pt: 12.0 * CM,
        body_font_size: 10.0,
        line_height_pt: 0.5 * CM,
        goals_max_lines: 20,
        development_max_lines: 15,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    latin1: &'static [(char, f32)],
    /// Fallback width for characters outside both tables.
    pub average_char_width: f32,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.latin1
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, w)| *w)
            .unwrap_or(self.average_char_width)
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Rendered width in points at the given font size.
    pub fn width_pt(&self, s: &str, font_size: f32) -> f32 {
        self.measure_str(s) * font_size
    }

    /// Greedy word wrap.
    ///
    /// A word joins the current sub-line while the joined width stays strictly below
    /// `max_width_pt`; otherwise the sub-line is flushed and the word starts the next
    /// one. A single word wider than the limit is emitted on its own, unbroken.
    /// Whitespace-only input yields no sub-lines.
    pub fn wrap(&self, text: &str, font_size: f32, max_width_pt: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if self.width_pt(&candidate, font_size) < max_width_pt {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    latin1: &[
        ('ä', 0.556), ('ö', 0.556), ('ü', 0.556),
        ('Ä', 0.667), ('Ö', 0.778), ('Ü', 0.722),
        ('ß', 0.611), ('é', 0.556), ('è', 0.556), ('à', 0.556), ('ç', 0.500),
    ],
    average_char_width: 0.556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    latin1: &[
        ('ä', 0.556), ('ö', 0.611), ('ü', 0.611),
        ('Ä', 0.722), ('Ö', 0.778), ('Ü', 0.722),
        ('ß', 0.611), ('é', 0.556), ('è', 0.556), ('à', 0.556), ('ç', 0.556),
    ],
    average_char_width: 0.611,
};

/// Returns the static metric table for a given font.
pub fn get_metrics(font: PdfFont) -> &'static FontMetricTable {
    match font {
        PdfFont::Helvetica => &HELVETICA_TABLE,
        PdfFont::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(PdfFont::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(PdfFont::Helvetica);
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = metrics.measure_str("Rust");
        assert!(
            (width - 2.056).abs() < 1e-3,
            "Rust width should be ~2.056, got {width}"
        );
    }

    #[test]
    fn test_umlauts_use_latin1_table() {
        let metrics = get_metrics(PdfFont::Helvetica);
        assert!((metrics.measure_str("Ö") - 0.778).abs() < 1e-4);
        // Unlisted non-ASCII falls back to the average width.
        assert!((metrics.measure_str("€") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Development areas";
        assert!(
            get_metrics(PdfFont::HelveticaBold).measure_str(text)
                > get_metrics(PdfFont::Helvetica).measure_str(text)
        );
    }

    #[test]
    fn test_width_pt_scales_with_font_size() {
        let metrics = get_metrics(PdfFont::Helvetica);
        let at_10 = metrics.width_pt("goals", 10.0);
        let at_20 = metrics.width_pt("goals", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_short_line_is_single() {
        let metrics = get_metrics(PdfFont::Helvetica);
        let config = default_page_config();
        assert_eq!(
            metrics.wrap("Lead project X", 10.0, config.content_width_pt),
            vec!["Lead project X".to_string()]
        );
    }

    #[test]
    fn test_wrap_long_line_respects_width() {
        let metrics = get_metrics(PdfFont::Helvetica);
        let config = default_page_config();
        let text = "Strengthen leadership skills through mentoring junior colleagues ".repeat(6);
        let lines = metrics.wrap(&text, 10.0, config.content_width_pt);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.width_pt(line, 10.0) < config.content_width_pt);
        }
        // No words lost or reordered.
        assert_eq!(
            lines.join(" "),
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }

    #[test]
    fn test_wrap_oversized_word_stands_alone() {
        let metrics = get_metrics(PdfFont::Helvetica);
        let word = "W".repeat(100);
        let lines = metrics.wrap(&format!("a {word} b"), 10.0, 200.0);
        assert_eq!(lines, vec!["a".to_string(), word, "b".to_string()]);
    }

    #[test]
    fn test_wrap_blank_input_yields_nothing() {
        let metrics = get_metrics(PdfFont::Helvetica);
        assert!(metrics.wrap("   ", 10.0, 200.0).is_empty());
        assert!(metrics.wrap("", 10.0, 200.0).is_empty());
    }

    #[test]
    fn test_default_page_config_is_a4() {
        let config = default_page_config();
        assert!((config.width_pt / CM - 21.0).abs() < 0.01);
        assert!((config.height_pt / CM - 29.7).abs() < 0.01);
        assert!(config.min_bottom_pt < config.section_break_pt);
        assert!(config.first_content_pt < config.top_content_pt);
        assert_eq!(config.goals_max_lines, 20);
        assert_eq!(config.development_max_lines, 15);
    }
}
