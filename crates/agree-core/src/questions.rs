//! The fixed consent checklist.
//!
//! The five questions are a closed set known at compile time. Display
//! order, ids, categories and prompt text are all part of the document
//! contract: the PDF renders them in exactly this order.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Stable identifier for one of the five checklist questions.
///
/// Ids are stable keys, not display positions; reordering the display
/// list must never change what an answer refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestionId {
    #[serde(rename = "freeWill")]
    FreeWill,
    #[serde(rename = "judgment")]
    Judgment,
    #[serde(rename = "equality")]
    Equality,
    #[serde(rename = "consideration")]
    Consideration,
    #[serde(rename = "withdrawal")]
    Withdrawal,
}

impl QuestionId {
    /// All ids, in checklist display order.
    pub const ALL: [QuestionId; 5] = [
        QuestionId::FreeWill,
        QuestionId::Judgment,
        QuestionId::Equality,
        QuestionId::Consideration,
        QuestionId::Withdrawal,
    ];

    /// Wire-form id string.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::FreeWill => "freeWill",
            QuestionId::Judgment => "judgment",
            QuestionId::Equality => "equality",
            QuestionId::Consideration => "consideration",
            QuestionId::Withdrawal => "withdrawal",
        }
    }

    /// Parse a wire-form id. Unknown ids are rejected rather than stored.
    pub fn parse(s: &str) -> Result<Self, RecordError> {
        match s {
            "freeWill" => Ok(QuestionId::FreeWill),
            "judgment" => Ok(QuestionId::Judgment),
            "equality" => Ok(QuestionId::Equality),
            "consideration" => Ok(QuestionId::Consideration),
            "withdrawal" => Ok(QuestionId::Withdrawal),
            other => Err(RecordError::InvalidQuestionId(other.to_string())),
        }
    }
}

/// One entry of the consent checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistQuestion {
    pub id: QuestionId,
    /// Short display label for the concern being checked.
    pub category: &'static str,
    /// The prompt shown in the form and printed on the document.
    pub question: &'static str,
}

/// The consent checklist, in display and print order.
pub const CONSENT_QUESTIONS: [ChecklistQuestion; 5] = [
    ChecklistQuestion {
        id: QuestionId::FreeWill,
        category: "自由な意思",
        question: "暴力・脅迫・恐怖による強制ではないか？",
    },
    ChecklistQuestion {
        id: QuestionId::Judgment,
        category: "判断能力",
        question: "アルコール・薬物・眠気・意識混濁はないか？",
    },
    ChecklistQuestion {
        id: QuestionId::Equality,
        category: "関係性の対等性",
        question: "地位利用・報復の恐怖による同意ではないか？",
    },
    ChecklistQuestion {
        id: QuestionId::Consideration,
        category: "判断の猶予",
        question: "不意打ちで動転していないか？",
    },
    ChecklistQuestion {
        id: QuestionId::Withdrawal,
        category: "撤回権の理解",
        question: "いつでも同意撤回可能であることを理解しているか？",
    },
];
