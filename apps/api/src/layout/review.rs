//! Layout of the review document.
//!
//! Fixed section order: banner, employee, manager, date, goals, development
//! notes, then a signature page that always comes last.

use chrono::{Datelike, NaiveDateTime};

use crate::layout::canvas::{Canvas, DocumentPlan, Rgb};
use crate::layout::font_metrics::{get_metrics, PageConfig, PdfFont, CM};
use crate::models::{Employee, ReviewRecord};

const HEADING_SIZE: f32 = 12.0;
const IDENTITY_SIZE: f32 = 11.0;
const SECTION_GAP: f32 = 1.5 * CM;

const NO_DATE: &str = "Not yet scheduled";
const NO_GOALS: &str = "No goals recorded";
const NO_DEVELOPMENT: &str = "No details";

/// Everything the layout needs, already joined.
#[derive(Debug, Clone, Copy)]
pub struct ReviewDocument<'a> {
    pub record: &'a ReviewRecord,
    pub subject: &'a Employee,
    pub manager: &'a Employee,
    pub generated_at: NaiveDateTime,
}

/// Lays out one review. Pure and deterministic for a given input.
pub fn layout_review(doc: &ReviewDocument<'_>, config: &PageConfig) -> DocumentPlan {
    let title = format!("Performance Review {}", doc.generated_at.year());
    let mut canvas = Canvas::new(title.clone(), config.width_pt, config.height_pt);

    // Banner
    canvas.set_fill(Rgb::from_u8(config.banner_color));
    canvas.fill_rect(
        0.0,
        config.height_pt - config.banner_height_pt,
        config.width_pt,
        config.banner_height_pt,
    );
    canvas.set_fill(Rgb::WHITE);
    canvas.set_font(PdfFont::HelveticaBold, 20.0);
    canvas.draw_string(config.margin_left_pt, config.height_pt - 2.0 * CM, title);
    canvas.set_font_size(10.0);
    canvas.draw_string(
        config.margin_left_pt,
        config.height_pt - 2.6 * CM,
        config.banner_subtitle.clone(),
    );

    canvas.set_fill(Rgb::BLACK);
    let mut y = config.first_content_pt;

    // Employee
    heading(&mut canvas, config, y, "Employee:");
    y -= 0.6 * CM;
    canvas.draw_string(config.margin_left_pt, y, doc.subject.display_name());
    y -= 0.5 * CM;
    canvas.draw_string(
        config.margin_left_pt,
        y,
        format!("Personnel number: {}", doc.subject.personnel_nr),
    );
    y -= 0.5 * CM;
    canvas.draw_string(
        config.margin_left_pt,
        y,
        format!("Department: {}", doc.subject.department),
    );

    // Manager
    y -= SECTION_GAP;
    heading(&mut canvas, config, y, "Manager:");
    y -= 0.6 * CM;
    canvas.draw_string(config.margin_left_pt, y, doc.manager.display_name());

    // Date
    y -= SECTION_GAP;
    heading(&mut canvas, config, y, "Date:");
    y -= 0.6 * CM;
    let date = doc
        .record
        .date
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| NO_DATE.to_string());
    canvas.draw_string(config.margin_left_pt, y, date);

    // Goals
    y -= SECTION_GAP;
    heading(&mut canvas, config, y, "Goals:");
    canvas.set_font(PdfFont::Helvetica, config.body_font_size);
    y -= 0.6 * CM;
    let goals = doc.record.goals.as_deref().unwrap_or(NO_GOALS);
    y = draw_free_text(&mut canvas, config, y, goals, config.goals_max_lines);

    // Development
    if y < config.section_break_pt {
        canvas.show_page();
        y = config.top_content_pt;
    }
    y -= 1.0 * CM;
    heading(&mut canvas, config, y, "Development areas:");
    canvas.set_font(PdfFont::Helvetica, config.body_font_size);
    y -= 0.6 * CM;
    let development = doc.record.development.as_deref().unwrap_or(NO_DEVELOPMENT);
    draw_free_text(
        &mut canvas,
        config,
        y,
        development,
        config.development_max_lines,
    );

    // Signatures always get their own page.
    canvas.show_page();
    draw_signature_page(&mut canvas, doc);

    canvas.finish()
}

/// Draws a bold heading and switches back to the identity font.
fn heading(canvas: &mut Canvas, config: &PageConfig, y: f32, text: &str) {
    canvas.set_font(PdfFont::HelveticaBold, HEADING_SIZE);
    canvas.draw_string(config.margin_left_pt, y, text);
    canvas.set_font(PdfFont::Helvetica, IDENTITY_SIZE);
}

/// Wraps and draws up to `max_lines` newline-delimited lines of `text`.
///
/// The page breaks before any sub-line whose baseline would sit below
/// `min_bottom_pt`. Returns the cursor after the last sub-line.
fn draw_free_text(
    canvas: &mut Canvas,
    config: &PageConfig,
    mut y: f32,
    text: &str,
    max_lines: usize,
) -> f32 {
    let metrics = get_metrics(PdfFont::Helvetica);
    for line in text.split('\n').take(max_lines) {
        for sub_line in metrics.wrap(line, config.body_font_size, config.content_width_pt) {
            if y < config.min_bottom_pt {
                canvas.show_page();
                y = config.top_content_pt;
            }
            canvas.draw_string(config.text_indent_pt, y, sub_line);
            y -= config.line_height_pt;
        }
    }
    y
}

fn draw_signature_page(canvas: &mut Canvas, doc: &ReviewDocument<'_>) {
    let mut y = 8.0 * CM;

    canvas.set_fill(Rgb::BLACK);
    canvas.set_font(PdfFont::Helvetica, 10.0);
    canvas.line(2.0 * CM, y, 8.0 * CM, y);
    canvas.line(12.0 * CM, y, 18.0 * CM, y);

    y -= 0.6 * CM;
    canvas.draw_string(2.0 * CM, y, doc.subject.display_name());
    canvas.draw_string(12.0 * CM, y, doc.manager.display_name());

    y -= 0.4 * CM;
    canvas.set_font_size(9.0);
    canvas.set_fill(Rgb::GREY);
    canvas.draw_string(2.0 * CM, y, "Employee");
    canvas.draw_string(12.0 * CM, y, "Manager");

    canvas.set_font_size(8.0);
    canvas.draw_string(
        2.0 * CM,
        2.0 * CM,
        format!(
            "Created on: {}",
            doc.generated_at.format("%d.%m.%Y at %H:%M")
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::DrawOp;
    use crate::layout::font_metrics::default_page_config;
    use crate::models::ReviewStatus;
    use chrono::NaiveDate;

    fn employee(nr: u32, first: &str, last: &str) -> Employee {
        Employee {
            personnel_nr: nr,
            last_name: last.to_string(),
            first_name: first.to_string(),
            email: None,
            department: "IT".to_string(),
            manager_nr: None,
        }
    }

    fn record(goals: Option<String>, development: Option<String>) -> ReviewRecord {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        ReviewRecord {
            id: 1,
            employee_id: 12345,
            manager_id: 67890,
            date: None,
            status: ReviewStatus::Planned,
            goals,
            development,
            feedback: None,
            pdf_path: None,
            created_at: ts,
            last_modified: ts,
        }
    }

    fn layout(record: &ReviewRecord) -> DocumentPlan {
        let subject = employee(12345, "Anna", "Müller");
        let manager = employee(67890, "Peter", "Schmidt");
        let doc = ReviewDocument {
            record,
            subject: &subject,
            manager: &manager,
            generated_at: NaiveDate::from_ymd_opt(2025, 3, 4)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
        };
        layout_review(&doc, &default_page_config())
    }

    fn assert_signature_page_last(plan: &DocumentPlan) {
        let last = plan.pages.last().unwrap();
        assert_eq!(last.line_count(), 2, "signature page has two signature lines");
        let texts = last.texts();
        assert!(texts.contains(&"Anna Müller"));
        assert!(texts.contains(&"Peter Schmidt"));
        assert!(texts.contains(&"Employee"));
        assert!(texts.contains(&"Manager"));
        assert!(texts.contains(&"Created on: 04.03.2025 at 14:05"));
        // Nothing else carries signature lines.
        for page in &plan.pages[..plan.pages.len() - 1] {
            assert_eq!(page.line_count(), 0);
        }
    }

    #[test]
    fn test_empty_record_is_one_content_page_plus_signatures() {
        let plan = layout(&record(None, None));
        assert_eq!(plan.page_count(), 2);
        let first = plan.pages[0].texts();
        assert!(first.contains(&"Performance Review 2025"));
        assert!(first.contains(&NO_DATE));
        assert!(first.contains(&NO_GOALS));
        assert!(first.contains(&NO_DEVELOPMENT));
        assert!(first.contains(&"Personnel number: 12345"));
        assert_signature_page_last(&plan);
    }

    #[test]
    fn test_banner_is_first_op() {
        let plan = layout(&record(None, None));
        match &plan.pages[0].ops[0] {
            DrawOp::FilledRect { y, height, .. } => {
                assert!((y + height - plan.height_pt).abs() < 1e-3);
            }
            other => panic!("expected banner rect, got {other:?}"),
        }
    }

    #[test]
    fn test_long_goals_spill_onto_second_page() {
        let goals = (1..=20)
            .map(|i| format!("Goal number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let plan = layout(&record(Some(goals), None));
        assert!(plan.page_count() > 2, "got {} pages", plan.page_count());
        // Every goal line was drawn, in order, across the pages.
        let all: Vec<&str> = plan.pages.iter().flat_map(|p| p.texts()).collect();
        let drawn: Vec<&&str> = all.iter().filter(|t| t.starts_with("Goal number")).collect();
        assert_eq!(drawn.len(), 20);
        assert_eq!(*drawn[19], "Goal number 20");
        assert_signature_page_last(&plan);
    }

    #[test]
    fn test_goal_lines_beyond_limit_are_dropped() {
        let goals = (1..=30)
            .map(|i| format!("Goal {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let plan = layout(&record(Some(goals), None));
        let all: Vec<&str> = plan.pages.iter().flat_map(|p| p.texts()).collect();
        assert!(all.contains(&"Goal 20"));
        assert!(!all.contains(&"Goal 21"));
    }

    #[test]
    fn test_development_lines_capped_at_fifteen() {
        let development = (1..=20)
            .map(|i| format!("Area {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let plan = layout(&record(None, Some(development)));
        let all: Vec<&str> = plan.pages.iter().flat_map(|p| p.texts()).collect();
        assert!(all.contains(&"Area 15"));
        assert!(!all.contains(&"Area 16"));
        assert_signature_page_last(&plan);
    }

    #[test]
    fn test_no_text_below_bottom_margin_on_content_pages() {
        let config = default_page_config();
        let long = "Deliver the platform migration on schedule and mentor two new hires ".repeat(4);
        let goals = vec![long.as_str(); 20].join("\n");
        let development = vec![long.as_str(); 15].join("\n");
        let plan = layout(&record(Some(goals), Some(development)));
        assert!(plan.page_count() >= 4);
        for page in &plan.pages[..plan.pages.len() - 1] {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(
                        *y >= config.min_bottom_pt - config.line_height_pt,
                        "text at y={y} is below the bottom margin"
                    );
                }
            }
        }
        assert_signature_page_last(&plan);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let r = record(Some("Lead project X\nBuild a team".into()), Some("Coaching".into()));
        assert_eq!(layout(&r), layout(&r));
    }
}
