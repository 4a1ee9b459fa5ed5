//! The in-memory consent record and its pure mutators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::questions::QuestionId;

/// A yes/no answer, in its wire form.
///
/// For checklist questions "no" means "no problem"; export is gated on
/// every checklist answer being `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

/// A user-added free-text question with an optional answer.
///
/// `answer: None` means not yet answered; the distinction matters both in
/// the form and on the printed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailItem {
    pub question: String,
    pub answer: Option<Answer>,
}

/// Which party a name mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    One,
    Two,
}

/// Stock detail questions seeded into a fresh session.
const SEED_QUESTIONS: [&str; 3] = ["挿入する", "避妊具を着用する", "避妊具を着用しない"];

/// The whole form state.
///
/// Unanswered checklist questions are simply absent from `answers`; the
/// enum key keeps out-of-set ids unrepresentable. Detail items keep their
/// insertion order, which is also display and print order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    pub name1: String,
    pub name2: String,
    pub answers: BTreeMap<QuestionId, Answer>,
    pub detail_items: Vec<DetailItem>,
}

impl ConsentRecord {
    /// A completely empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session-start record, carrying the stock detail questions.
    pub fn seeded() -> Self {
        Self {
            detail_items: SEED_QUESTIONS
                .iter()
                .map(|q| DetailItem {
                    question: (*q).to_string(),
                    answer: None,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Discard everything, e.g. when dropping a decoded inbound record.
    pub fn reset(self) -> Self {
        Self::new()
    }

    /// Store a party name as typed. Trimming happens only at read time.
    pub fn set_name(mut self, party: Party, value: impl Into<String>) -> Self {
        match party {
            Party::One => self.name1 = value.into(),
            Party::Two => self.name2 = value.into(),
        }
        self
    }

    /// Upsert a checklist answer.
    pub fn set_answer(mut self, id: QuestionId, answer: Answer) -> Self {
        self.answers.insert(id, answer);
        self
    }

    /// String-keyed variant for callers holding wire-form ids. Unknown ids
    /// are rejected and leave `answers` untouched.
    pub fn set_answer_by_id(self, id: &str, answer: Answer) -> Result<Self, RecordError> {
        let id = QuestionId::parse(id)?;
        Ok(self.set_answer(id, answer))
    }

    /// Append a detail item. Whitespace-only input is silently ignored.
    pub fn add_detail_item(mut self, question: &str) -> Self {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return self;
        }
        self.detail_items.push(DetailItem {
            question: trimmed.to_string(),
            answer: None,
        });
        self
    }

    /// Remove the detail item at `index`.
    pub fn remove_detail_item(mut self, index: usize) -> Result<Self, RecordError> {
        if index >= self.detail_items.len() {
            return Err(RecordError::IndexOutOfRange {
                index,
                len: self.detail_items.len(),
            });
        }
        self.detail_items.remove(index);
        Ok(self)
    }

    /// Answer the detail item at `index`, preserving its question and
    /// position.
    pub fn set_detail_item_answer(
        mut self,
        index: usize,
        answer: Answer,
    ) -> Result<Self, RecordError> {
        let len = self.detail_items.len();
        match self.detail_items.get_mut(index) {
            Some(item) => {
                item.answer = Some(answer);
                Ok(self)
            }
            None => Err(RecordError::IndexOutOfRange { index, len }),
        }
    }

    /// The PDF export gate: both names entered (after trimming) and every
    /// one of the five checklist questions answered `No`. An unanswered
    /// question counts the same as a `Yes`.
    pub fn is_export_eligible(&self) -> bool {
        !self.name1.trim().is_empty()
            && !self.name2.trim().is_empty()
            && QuestionId::ALL
                .iter()
                .all(|id| self.answers.get(id) == Some(&Answer::No))
    }

    /// Whether there is anything worth sharing via QR: a trimmed name or
    /// at least one detail item.
    pub fn has_shareable_data(&self) -> bool {
        !self.name1.trim().is_empty()
            || !self.name2.trim().is_empty()
            || !self.detail_items.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn arb_answer() -> impl Strategy<Value = Answer> {
        prop_oneof![Just(Answer::Yes), Just(Answer::No)]
    }

    fn arb_answers() -> impl Strategy<Value = BTreeMap<QuestionId, Answer>> {
        proptest::collection::vec(
            (proptest::sample::select(QuestionId::ALL.to_vec()), arb_answer()),
            0..8,
        )
        .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        /// Eligibility holds exactly when both names survive trimming and
        /// all five answers are `No`.
        #[test]
        fn eligibility_matches_definition(
            name1 in ".{0,12}",
            name2 in ".{0,12}",
            answers in arb_answers(),
        ) {
            let record = ConsentRecord {
                name1: name1.clone(),
                name2: name2.clone(),
                answers: answers.clone(),
                detail_items: Vec::new(),
            };
            let expected = !name1.trim().is_empty()
                && !name2.trim().is_empty()
                && QuestionId::ALL
                    .iter()
                    .all(|id| answers.get(id) == Some(&Answer::No));
            prop_assert_eq!(record.is_export_eligible(), expected);
        }

        /// Adding a detail item never stores surrounding whitespace and
        /// never changes anything else on the record.
        #[test]
        fn add_detail_item_only_appends_trimmed(question in ".{0,24}") {
            let before = ConsentRecord::seeded();
            let after = before.clone().add_detail_item(&question);

            let trimmed = question.trim();
            if trimmed.is_empty() {
                prop_assert_eq!(after, before);
            } else {
                prop_assert_eq!(after.detail_items.len(), before.detail_items.len() + 1);
                let last = after.detail_items.last().unwrap();
                prop_assert_eq!(last.question.as_str(), trimmed);
                prop_assert_eq!(last.answer, None);
                prop_assert_eq!(&after.name1, &before.name1);
                prop_assert_eq!(&after.answers, &before.answers);
            }
        }

        /// Names are stored raw; trimming is a read-time concern.
        #[test]
        fn set_name_stores_raw_value(value in ".{0,24}") {
            let record = ConsentRecord::new().set_name(Party::One, value.clone());
            prop_assert_eq!(record.name1, value);
        }

        /// Detail answers never move or rewrite the question text.
        #[test]
        fn detail_answer_is_positionally_stable(
            questions in proptest::collection::vec("[a-zA-Z]{1,8}", 1..6),
            index in 0usize..6,
            answer in arb_answer(),
        ) {
            let mut record = ConsentRecord::new();
            for q in &questions {
                record = record.add_detail_item(q);
            }
            let result = record.clone().set_detail_item_answer(index, answer);
            if index < questions.len() {
                let updated = result.unwrap();
                for (i, q) in questions.iter().enumerate() {
                    prop_assert_eq!(&updated.detail_items[i].question, q);
                    if i == index {
                        prop_assert_eq!(updated.detail_items[i].answer, Some(answer));
                    } else {
                        prop_assert_eq!(updated.detail_items[i].answer, None);
                    }
                }
            } else {
                prop_assert_eq!(
                    result.unwrap_err(),
                    RecordError::IndexOutOfRange { index, len: questions.len() }
                );
            }
        }
    }
}
