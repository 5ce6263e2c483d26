//! Review document layout: font metrics, a recording canvas, and the page plan
//! for one review. Pure computation; writing bytes is the renderer's job.

pub mod canvas;
pub mod font_metrics;
pub mod review;

// Re-export the public API consumed by the renderer and handlers.
pub use canvas::{DocumentPlan, DrawOp, Rgb};
pub use font_metrics::{default_page_config, PageConfig, PdfFont};
pub use review::{layout_review, ReviewDocument};
