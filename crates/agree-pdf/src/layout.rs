//! Deterministic page layout.
//!
//! Maps a record and a generation timestamp to a flat list of page
//! operations in millimeter coordinates, top-left origin, flowing a
//! vertical cursor downward. The section order and inclusion rules are
//! the contract; the writer only draws what this module emits.

use agree_core::{Answer, ConsentRecord, DetailItem, CONSENT_QUESTIONS};
use chrono::NaiveDateTime;

/// A4 portrait.
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

const CENTER_MM: f64 = PAGE_WIDTH_MM / 2.0;

/// Placeholder printed for a missing party name.
const NAME_PLACEHOLDER: &str = "（未入力）";

const DISCLAIMER_LINE_1: &str = "本書類は意思確認の補助ツールであり、法的拘束力はありません。";
const DISCLAIMER_LINE_2: &str = "脅迫・強要・泥酔状態での同意は無効です。同意はいつでも撤回可能です。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One drawing operation on the single page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOp {
    Text {
        text: String,
        x_mm: f64,
        y_mm: f64,
        size_pt: f64,
        align: Align,
        /// Fill gray level, 0.0 = black.
        gray: f64,
    },
    Rule {
        x1_mm: f64,
        x2_mm: f64,
        y_mm: f64,
    },
}

impl PageOp {
    fn text(text: impl Into<String>, x_mm: f64, y_mm: f64, size_pt: f64) -> Self {
        PageOp::Text {
            text: text.into(),
            x_mm,
            y_mm,
            size_pt,
            align: Align::Left,
            gray: 0.0,
        }
    }

    fn centered(text: impl Into<String>, y_mm: f64, size_pt: f64, gray: f64) -> Self {
        PageOp::Text {
            text: text.into(),
            x_mm: CENTER_MM,
            y_mm,
            size_pt,
            align: Align::Center,
            gray,
        }
    }

    fn at_x(mut self, x: f64) -> Self {
        if let PageOp::Text { ref mut x_mm, .. } = self {
            *x_mm = x;
        }
        self
    }
}

/// The pass/fail marker for one checklist answer. "No problem" is the
/// only passing answer; unanswered prints the same as an explicit yes.
fn checklist_marker(answer: Option<&Answer>) -> &'static str {
    match answer {
        Some(Answer::No) => "[OK]",
        _ => "[NG]",
    }
}

/// The three-way label for a detail-item answer.
fn detail_label(item: &DetailItem) -> &'static str {
    match item.answer {
        Some(Answer::Yes) => "[はい]",
        Some(Answer::No) => "[いいえ]",
        None => "[回答しない]",
    }
}

fn name_or_placeholder(name: &str) -> &str {
    if name.is_empty() {
        NAME_PLACEHOLDER
    } else {
        name
    }
}

/// Lay the record out on the page.
pub fn layout_document(record: &ConsentRecord, now: &NaiveDateTime) -> Vec<PageOp> {
    let mut ops = Vec::new();
    let mut y = 20.0;

    // Title
    ops.push(PageOp::centered("Agree", y, 18.0, 0.0));
    y += 15.0;

    // Fixed disclaimer, not derived from input
    ops.push(PageOp::centered(DISCLAIMER_LINE_1, y, 9.0, 0.5));
    ops.push(PageOp::centered(DISCLAIMER_LINE_2, y + 5.0, 9.0, 0.5));
    y += 15.0;

    // Generation timestamp, not the time the form was filled in
    let stamp = now.format("%Y年%-m月%-d日 %H:%M");
    ops.push(PageOp::text(format!("日時: {stamp}"), 20.0, y, 11.0));
    y += 12.0;

    // Parties
    ops.push(PageOp::text("当事者:", 20.0, y, 12.0));
    y += 7.0;
    ops.push(PageOp::text(
        format!("  氏名 1: {}", name_or_placeholder(&record.name1)),
        20.0,
        y,
        11.0,
    ));
    y += 6.0;
    ops.push(PageOp::text(
        format!("  氏名 2: {}", name_or_placeholder(&record.name2)),
        20.0,
        y,
        11.0,
    ));
    y += 12.0;

    // Checklist, always all five, in static table order
    ops.push(PageOp::text("意思確認項目:", 20.0, y, 12.0));
    y += 8.0;
    for (index, q) in CONSENT_QUESTIONS.iter().enumerate() {
        let marker = checklist_marker(record.answers.get(&q.id));
        ops.push(PageOp::text(
            format!("{}. {} {}", index + 1, q.question, marker),
            25.0,
            y,
            10.0,
        ));
        y += 6.0;
    }
    y += 5.0;

    // Detail section only when there are items
    if !record.detail_items.is_empty() {
        ops.push(PageOp::text("詳細条件:", 20.0, y, 12.0));
        y += 8.0;
        for item in &record.detail_items {
            ops.push(PageOp::text(
                format!("{}: {}", item.question, detail_label(item)),
                25.0,
                y,
                10.0,
            ));
            y += 6.0;
        }
    }
    y += 20.0;

    // Signature lines, one per party
    ops.push(PageOp::text("署名:", 20.0, y, 11.0));
    y += 15.0;

    ops.push(PageOp::Rule {
        x1_mm: 25.0,
        x2_mm: 90.0,
        y_mm: y,
    });
    ops.push(PageOp::centered(
        signature_caption(&record.name1, 1),
        y + 5.0,
        11.0,
        0.0,
    )
    .at_x(57.5));

    ops.push(PageOp::Rule {
        x1_mm: 110.0,
        x2_mm: 175.0,
        y_mm: y,
    });
    ops.push(PageOp::centered(
        signature_caption(&record.name2, 2),
        y + 5.0,
        11.0,
        0.0,
    )
    .at_x(142.5));

    ops
}

fn signature_caption(name: &str, party: u8) -> String {
    if name.is_empty() {
        format!("氏名 {party}")
    } else {
        name.to_string()
    }
}
