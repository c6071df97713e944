//! Health digest — a paginated, printable summary of the profile plus
//! narrative insights.
//!
//! Page 1 carries the personal block and the vital sign, medical history
//! and lifestyle tables. The narrative starts on page 2 and flows onto as
//! many pages as it needs. Footers ("Page i of n") are stamped only after
//! layout has finished, so every page sees the final total.

pub mod layout;
pub mod pdf;

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::metrics::bmi_for;
use crate::models::HealthProfile;

use layout::{
    approx_text_width_mm, wrap_text, Align, Element, Page, PageLayout, TextStyle,
    CENTER_X_MM, CONTINUATION_TOP_MM, FOOTER_Y_MM, MARGIN_LEFT_MM, MARGIN_RIGHT_MM,
    PAGE_BOTTOM_MM,
};

pub use pdf::{digest_filename, export_digest, render_pdf, render_pdf_async, DigestError};

pub const DIGEST_TITLE: &str = "Arogya Health Digest";
pub const NARRATIVE_TITLE: &str = "Health Insights & Recommendations";
/// Substituted when no narrative text is available.
pub const NARRATIVE_PLACEHOLDER: &str = "No insights generated yet.";
/// Column width (characters) for narrative body text.
pub const NARRATIVE_WRAP_COLUMNS: usize = 95;
/// Column width (characters) for the value column of tables.
const TABLE_VALUE_COLUMNS: usize = 62;

const TABLE_LABEL_WIDTH_MM: f32 = 60.0;
const TABLE_LINE_HEIGHT_MM: f32 = 5.0;
const TABLE_ROW_PADDING_MM: f32 = 3.0;

const NOT_AVAILABLE: &str = "N/A";
const NONE_REPORTED: &str = "None reported";

static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s*").unwrap());

/// A fully laid-out digest, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub pages: Vec<Page>,
}

impl DigestDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lays out the digest for `profile` with `narrative` as the insights text.
pub fn compose(profile: &HealthProfile, narrative: &str, generated_on: NaiveDate) -> DigestDocument {
    let mut layout = PageLayout::new();

    title_block(&mut layout, generated_on);
    personal_block(&mut layout, profile);
    section_table(&mut layout, "Vital Signs", ("Metric", "Value"), &vital_rows(profile));
    section_table(
        &mut layout,
        "Medical History",
        ("Category", "Details"),
        &history_rows(profile),
    );
    section_table(&mut layout, "Lifestyle", ("Category", "Status"), &lifestyle_rows(profile));

    let narrative = if narrative.trim().is_empty() {
        NARRATIVE_PLACEHOLDER
    } else {
        narrative
    };
    narrative_pages(&mut layout, narrative);

    let mut pages = layout.into_pages();
    stamp_footers(&mut pages);

    tracing::debug!(pages = pages.len(), "Digest laid out");
    DigestDocument {
        title: DIGEST_TITLE.to_string(),
        generated_on,
        pages,
    }
}

fn centered(layout: &mut PageLayout, text: &str, y: f32, style: TextStyle) {
    let width = approx_text_width_mm(text, style.font_size());
    layout.text_at(text, CENTER_X_MM - width / 2.0, y, style, Align::Center);
}

fn title_block(layout: &mut PageLayout, generated_on: NaiveDate) {
    centered(layout, DIGEST_TITLE, 15.0, TextStyle::Title);
    let subtitle = format!("Generated on: {}", generated_on.format("%Y-%m-%d"));
    centered(layout, &subtitle, 22.0, TextStyle::Subtitle);
    layout.y = 35.0;
}

fn personal_block(layout: &mut PageLayout, profile: &HealthProfile) {
    let info = &profile.personal_info;
    layout.text("Personal Information", MARGIN_LEFT_MM, TextStyle::Section);
    layout.y += 10.0;

    let mut lines = vec![
        format!("Name: {}", info.name),
        format!("Age: {}", info.age),
        format!("Gender: {}", info.gender),
        format!("Height: {} cm", info.height),
        format!("Weight: {} kg", info.weight),
        format!("Blood Type: {}", info.blood_type),
    ];
    if let Some(bmi) = bmi_for(profile) {
        lines.push(format!("BMI: {bmi}"));
    }

    for line in lines {
        layout.text(line, MARGIN_LEFT_MM, TextStyle::Body);
        layout.y += 5.0;
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn with_unit(value: &str, unit: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{value} {unit}")
    }
}

fn vital_rows(profile: &HealthProfile) -> Vec<(String, String)> {
    let v = &profile.vital_signs;
    vec![
        ("Blood Pressure".into(), or_placeholder(&v.blood_pressure, NOT_AVAILABLE)),
        ("Heart Rate".into(), with_unit(&v.heart_rate, "bpm")),
        ("Blood Sugar".into(), with_unit(&v.blood_sugar, "mg/dL")),
        ("Cholesterol".into(), with_unit(&v.cholesterol, "mg/dL")),
    ]
}

fn history_rows(profile: &HealthProfile) -> Vec<(String, String)> {
    let h = &profile.medical_history;
    vec![
        (
            "Medical Conditions".into(),
            h.condition_summary().unwrap_or_else(|| NONE_REPORTED.into()),
        ),
        ("Allergies".into(), or_placeholder(&h.allergies, NONE_REPORTED)),
        ("Current Medications".into(), or_placeholder(&h.medications, NONE_REPORTED)),
        ("Past Surgeries".into(), or_placeholder(&h.surgeries, NONE_REPORTED)),
    ]
}

fn lifestyle_rows(profile: &HealthProfile) -> Vec<(String, String)> {
    let l = &profile.lifestyle;
    vec![
        ("Smoking".into(), l.smoking.label().into()),
        ("Alcohol".into(), l.alcohol.label().into()),
        ("Exercise".into(), l.exercise.label().into()),
        ("Diet".into(), l.diet.label().into()),
        ("Sleep".into(), l.sleep.label().into()),
    ]
}

/// Section title followed by a two-column grid table.
fn section_table(
    layout: &mut PageLayout,
    title: &str,
    header: (&str, &str),
    rows: &[(String, String)],
) {
    layout.y += 10.0;
    // Keep the title with at least the header row
    layout.ensure_room(20.0);
    layout.text(title, MARGIN_LEFT_MM, TextStyle::Section);
    layout.y += 5.0;

    let header_row = |layout: &mut PageLayout| {
        table_row(layout, header.0, &[header.1.to_string()], TextStyle::TableHeader);
    };
    let fresh_page_lines = lines_that_fit(CONTINUATION_TOP_MM + row_height(1));

    header_row(layout);
    for (label, value) in rows {
        let lines = wrap_text(value, TABLE_VALUE_COLUMNS);
        let mut remaining = lines.as_slice();
        let mut label = label.as_str();

        while !remaining.is_empty() {
            let fit = lines_that_fit(layout.y);
            // A row that fits on a page of its own is never split
            let move_whole = remaining.len() > fit && remaining.len() <= fresh_page_lines;
            if fit == 0 || move_whole {
                layout.new_page(CONTINUATION_TOP_MM);
                header_row(layout);
                continue;
            }

            let (chunk, rest) = remaining.split_at(remaining.len().min(fit));
            table_row(layout, label, chunk, TextStyle::TableCell);
            remaining = rest;
            label = "";
            if !remaining.is_empty() {
                layout.new_page(CONTINUATION_TOP_MM);
                header_row(layout);
            }
        }
    }
}

fn row_height(lines: usize) -> f32 {
    lines.max(1) as f32 * TABLE_LINE_HEIGHT_MM + TABLE_ROW_PADDING_MM
}

/// Value lines a row starting at `top` can hold above the bottom margin.
fn lines_that_fit(top: f32) -> usize {
    let room = PAGE_BOTTOM_MM - top - TABLE_ROW_PADDING_MM;
    if room < TABLE_LINE_HEIGHT_MM {
        0
    } else {
        (room / TABLE_LINE_HEIGHT_MM).floor() as usize
    }
}

fn table_row(layout: &mut PageLayout, label: &str, value_lines: &[String], style: TextStyle) {
    let top = layout.y;
    let height = row_height(value_lines.len());
    let bottom = top + height;
    let value_x = MARGIN_LEFT_MM + TABLE_LABEL_WIDTH_MM;

    layout.rule(MARGIN_LEFT_MM, top, MARGIN_RIGHT_MM, top);
    layout.rule(MARGIN_LEFT_MM, bottom, MARGIN_RIGHT_MM, bottom);
    for x in [MARGIN_LEFT_MM, value_x, MARGIN_RIGHT_MM] {
        layout.rule(x, top, x, bottom);
    }

    let baseline = top + TABLE_LINE_HEIGHT_MM;
    if !label.is_empty() {
        layout.text_at(label, MARGIN_LEFT_MM + 2.0, baseline, style, Align::Left);
    }
    for (i, line) in value_lines.iter().enumerate() {
        let y = baseline + i as f32 * TABLE_LINE_HEIGHT_MM;
        layout.text_at(line.as_str(), value_x + 2.0, y, style, Align::Left);
    }
    layout.y = bottom;
}

/// Strips the heading marker run, or `None` for ordinary lines. A bare
/// marker yields an empty heading.
fn heading_text(line: &str) -> Option<String> {
    line.starts_with('#')
        .then(|| HEADING_MARKER.replace(line, "").trim_end().to_string())
}

fn narrative_pages(layout: &mut PageLayout, narrative: &str) {
    layout.new_page(15.0);
    centered(layout, NARRATIVE_TITLE, 15.0, TextStyle::Heading);
    layout.y = 30.0;

    for line in narrative.lines() {
        match heading_text(line) {
            Some(heading) if !heading.is_empty() => {
                layout.text(heading, MARGIN_LEFT_MM, TextStyle::Heading);
                layout.y += 8.0;
            }
            // Bare "#" lines count as blank
            Some(_) => layout.y += 5.0,
            None if line.trim().is_empty() => layout.y += 5.0,
            None => {
                for wrapped in wrap_text(line, NARRATIVE_WRAP_COLUMNS) {
                    layout.text(wrapped, MARGIN_LEFT_MM, TextStyle::Body);
                    layout.y += 5.0;
                    layout.break_if_past_bottom();
                }
            }
        }
        layout.break_if_past_bottom();
    }
}

/// Deferred pass: the total is only known once every page exists.
fn stamp_footers(pages: &mut [Page]) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        let text = format!("{DIGEST_TITLE} - Page {} of {total}", i + 1);
        let width = approx_text_width_mm(&text, TextStyle::Footer.font_size());
        page.elements.push(Element::Text {
            text,
            x: CENTER_X_MM - width / 2.0,
            y: FOOTER_Y_MM,
            style: TextStyle::Footer,
            align: Align::Center,
        });
    }
}
