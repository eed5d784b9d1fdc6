//! Pagination of an award aggregate into positioned text blocks.
//!
//! The algorithm is a single sequential pass with a vertical cursor. All
//! measurements are millimetres on an A4 portrait page; `y` grows downward
//! from the top edge. Serialization to an actual document format lives in
//! `writer`.

use db::models::dispute::DocumentType;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{award::AwardDocument, metrics::wrap_text};

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 20.0;

const TOP_START: f64 = 20.0;
const LINE_HEIGHT: f64 = 5.0;

const TITLE_SIZE: f64 = 16.0;
const SUBTITLE_SIZE: f64 = 12.0;
const BODY_SIZE: f64 = 11.0;
const FOOTER_SIZE: f64 = 9.0;
const FOOTER_SHADE: u8 = 100;

// Page-break thresholds. Entries of the submitted-documents list break
// earlier than the long-form sections; the first long-form section breaks
// earliest so a full summary block fits.
const ENTRY_BREAK: f64 = 270.0;
const SUMMARY_BREAK: f64 = 240.0;
const SECTION_BREAK: f64 = 250.0;

// Free-flowing section bodies start a new page rather than run past the
// bottom margin.
const BOTTOM_LIMIT: f64 = PAGE_HEIGHT - MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub enum Align {
    Left,
    Center,
}

/// One positioned piece of text. `x` is the left edge for left-aligned
/// blocks and the center anchor for centered ones.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TextBlock {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub bold: bool,
    pub align: Align,
    /// Grey level 0 (black) to 255; absent means black.
    pub shade: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct Page {
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Document {
    pub pages: Vec<Page>,
}

struct Cursor {
    done: Vec<Page>,
    current: Page,
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Page::default(),
            y: TOP_START,
        }
    }

    fn text(&mut self, text: &str, x: f64, size: f64, bold: bool) {
        self.current.blocks.push(TextBlock {
            text: text.to_string(),
            x,
            y: self.y,
            size,
            bold,
            align: Align::Left,
            shade: None,
        });
    }

    fn centered(&mut self, text: &str, size: f64, bold: bool) {
        self.current.blocks.push(TextBlock {
            text: text.to_string(),
            x: PAGE_WIDTH / 2.0,
            y: self.y,
            size,
            bold,
            align: Align::Center,
            shade: None,
        });
    }

    fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    fn break_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.y = TOP_START;
    }

    fn break_if_past(&mut self, limit: f64) {
        if self.y > limit {
            self.break_page();
        }
    }

    /// Place a bold section heading, then its wrapped body at the given
    /// width, breaking to a new page whenever a body line would land past
    /// the bottom margin.
    fn flowed_section(&mut self, heading: &str, body: &str, width: f64) {
        self.text(heading, MARGIN, BODY_SIZE, true);
        self.advance(8.0);
        for line in wrap_text(body, width, BODY_SIZE, false) {
            if self.y > BOTTOM_LIMIT {
                self.break_page();
            }
            self.text(&line, MARGIN, BODY_SIZE, false);
            self.advance(LINE_HEIGHT);
        }
    }

    fn finish(mut self) -> Document {
        self.done.push(self.current);
        Document { pages: self.done }
    }
}

// The role line is a function of the document type alone: an award is
// signed by an arbitrator, a report by a mediator.
fn role_heading(document_type: &DocumentType) -> &'static str {
    match document_type {
        DocumentType::ArbitrationAward => "ARBITRATOR:",
        DocumentType::MediationReport => "MEDIATOR:",
    }
}

/// Paginate an award aggregate. Pure and total: any aggregate renders to at
/// least one page, however long its free-text sections are.
pub fn render_award(award: &AwardDocument) -> Document {
    let mut cur = Cursor::new();
    let usable_width = PAGE_WIDTH - 2.0 * MARGIN;
    let date_line = format_date(&award.issued_at);

    cur.centered(award.document_type.heading(), TITLE_SIZE, true);
    cur.advance(10.0);

    cur.centered(&format!("Case ID: {}", award.case_code), SUBTITLE_SIZE, true);
    cur.advance(6.0);
    cur.centered(
        &format!("Resolution Method: {}", award.resolution_method.label()),
        SUBTITLE_SIZE,
        true,
    );
    cur.advance(15.0);

    cur.text("PARTIES INVOLVED:", MARGIN, SUBTITLE_SIZE, true);
    cur.advance(8.0);

    cur.text(
        &format!("Applicant: {}", award.applicant_name),
        MARGIN,
        BODY_SIZE,
        false,
    );
    cur.advance(6.0);
    match &award.applicant_advocate {
        Some(advocate) => {
            cur.text(
                &format!("Applicant's Advocate: {}", advocate.name),
                MARGIN + 5.0,
                BODY_SIZE,
                false,
            );
            cur.advance(5.0);
            cur.text(
                &format!("Contact: {}", advocate.phone),
                MARGIN + 5.0,
                BODY_SIZE,
                false,
            );
            cur.advance(8.0);
        }
        None => cur.advance(6.0),
    }

    cur.text(
        &format!("Respondent: {}", award.respondent_name),
        MARGIN,
        BODY_SIZE,
        false,
    );
    cur.advance(6.0);
    match &award.respondent_advocate {
        Some(advocate) => {
            cur.text(
                &format!("Respondent's Advocate: {}", advocate.name),
                MARGIN + 5.0,
                BODY_SIZE,
                false,
            );
            cur.advance(5.0);
            cur.text(
                &format!("Contact: {}", advocate.phone),
                MARGIN + 5.0,
                BODY_SIZE,
                false,
            );
            cur.advance(8.0);
        }
        None => cur.advance(6.0),
    }

    cur.text(role_heading(&award.document_type), MARGIN, BODY_SIZE, true);
    cur.advance(6.0);
    cur.text(&award.professional_name, MARGIN, BODY_SIZE, false);
    cur.advance(10.0);

    cur.text("PROCEEDINGS SUMMARY:", MARGIN, BODY_SIZE, true);
    cur.advance(8.0);
    cur.text(
        &format!("Number of Meetings Held: {}", award.meetings_count),
        MARGIN,
        BODY_SIZE,
        false,
    );
    cur.advance(6.0);
    cur.text(
        &format!("Final Hearing Date: {}", date_line),
        MARGIN,
        BODY_SIZE,
        false,
    );
    cur.advance(10.0);

    if !award.documents_submitted.is_empty() {
        cur.text("DOCUMENTS SUBMITTED:", MARGIN, BODY_SIZE, true);
        cur.advance(8.0);

        for (index, entry) in award.documents_submitted.iter().enumerate() {
            // An entry and its wrapped description are placed together;
            // the break check runs only between entries.
            cur.text(
                &format!(
                    "{}. {} (by {})",
                    index + 1,
                    entry.document_name,
                    entry.submitted_by
                ),
                MARGIN + 5.0,
                BODY_SIZE,
                false,
            );
            cur.advance(5.0);
            if let Some(description) = &entry.description {
                for line in wrap_text(description, usable_width - 10.0, BODY_SIZE, false) {
                    cur.text(&line, MARGIN + 5.0, BODY_SIZE, false);
                    cur.advance(LINE_HEIGHT);
                }
            }
            cur.advance(3.0);
            cur.break_if_past(ENTRY_BREAK);
        }
        cur.advance(5.0);
    }

    cur.break_if_past(SUMMARY_BREAK);
    cur.flowed_section("RESOLUTION SUMMARY:", &award.resolution_summary, usable_width);
    cur.advance(8.0);

    cur.break_if_past(SECTION_BREAK);
    cur.flowed_section("OUTCOMES:", &award.outcomes, usable_width);
    cur.advance(8.0);

    cur.break_if_past(SECTION_BREAK);
    cur.flowed_section(
        "TERMS AND CONDITIONS:",
        &award.terms_and_conditions,
        usable_width,
    );
    cur.advance(15.0);

    cur.break_if_past(SECTION_BREAK);
    cur.text("DIGITALLY SIGNED BY:", MARGIN, BODY_SIZE, true);
    cur.advance(8.0);
    cur.text(&award.professional_name, MARGIN, BODY_SIZE, false);
    cur.advance(6.0);
    cur.text(&format!("Date: {}", date_line), MARGIN, BODY_SIZE, false);
    cur.advance(15.0);

    let footer_y = cur.y;
    cur.current.blocks.push(TextBlock {
        text: "This document is generated by eNyaya Resolve".to_string(),
        x: PAGE_WIDTH / 2.0,
        y: footer_y,
        size: FOOTER_SIZE,
        bold: false,
        align: Align::Center,
        shade: Some(FOOTER_SHADE),
    });

    cur.finish()
}

/// Unpadded day/month/year, the en-IN short date.
fn format_date(at: &chrono::DateTime<chrono::Utc>) -> String {
    use chrono::Datelike;
    format!("{}/{}/{}", at.day(), at.month(), at.year())
}
