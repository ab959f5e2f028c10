//! Practice session flow - advancing through lesson items and tracking attempts

use chrono::{DateTime, Utc};
#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::scorer::ComparisonResult;
use crate::thresholds::Thresholds;
use crate::transcriber::{transcribe_and_validate, AudioRef, Transcriber};

/// Role a lesson section plays in practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Core vocabulary to practice
    Positive,
    /// Supporting vocabulary, also practiced
    Neutral,
    /// Recognition only, never practiced aloud
    Awareness,
}

/// A vocabulary word or phrase presented to the learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonItem {
    pub id: String,
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
}

impl LessonItem {
    pub fn new(id: impl Into<String>, word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            translation: translation.into(),
            phonetic: None,
        }
    }

    pub fn with_phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic = Some(phonetic.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub kind: SectionKind,
    pub title: String,
    pub items: Vec<LessonItem>,
}

/// Items to practice, in lesson order, skipping awareness sections
pub fn practice_items(sections: &[LessonSection]) -> Vec<LessonItem> {
    sections
        .iter()
        .filter(|section| section.kind != SectionKind::Awareness)
        .flat_map(|section| section.items.iter().cloned())
        .collect()
}

/// What the practice flow does after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Advance,
    Retry,
}

/// Advance when the verdict is correct or the similarity clears the lenient bar
pub fn decide(result: &ComparisonResult, thresholds: &Thresholds) -> Decision {
    if result.is_correct || result.similarity > thresholds.lenient_accept {
        Decision::Advance
    } else {
        Decision::Retry
    }
}

/// Feedback shown to the learner after an attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub decision: Decision,
    pub message: String,
}

/// An accepted answer for one practice item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeResponse {
    pub item_id: String,
    pub user_response: String,
    pub expected_response: String,
    /// Strict verdict, even when the lenient bar advanced the item
    pub is_correct: bool,
    pub similarity: f64,
    pub attempts: u32,
}

/// Attempt statistics for a session
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptStats {
    pub total_attempts: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub accuracy_percent: f64,
}

#[cfg(feature = "python")]
#[pymethods]
impl AttemptStats {
    fn __repr__(&self) -> String {
        format!(
            "AttemptStats(total={}, correct={}, accuracy={:.1}%)",
            self.total_attempts, self.correct_count, self.accuracy_percent
        )
    }
}

/// One run through a lesson's practice items
#[derive(Debug, Clone, Serialize)]
pub struct PracticeSession {
    lesson_id: String,
    items: Vec<LessonItem>,
    #[serde(skip)]
    thresholds: Thresholds,
    current_index: usize,
    /// Retries on the current item so far
    #[serde(skip)]
    attempt_count: u32,
    responses: Vec<PracticeResponse>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    pub fn new(
        lesson_id: impl Into<String>,
        items: Vec<LessonItem>,
        thresholds: Thresholds,
    ) -> Result<Self> {
        let lesson_id = lesson_id.into();
        if items.is_empty() {
            return Err(Error::Session(format!(
                "lesson {} has no practice items",
                lesson_id
            )));
        }
        thresholds.validate()?;

        info!(lesson_id = %lesson_id, items = items.len(), "Starting practice session");
        Ok(Self {
            lesson_id,
            items,
            thresholds,
            current_index: 0,
            attempt_count: 0,
            responses: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        })
    }

    /// Build a session from lesson sections, dropping awareness-only items
    pub fn from_sections(
        lesson_id: impl Into<String>,
        sections: &[LessonSection],
        thresholds: Thresholds,
    ) -> Result<Self> {
        Self::new(lesson_id, practice_items(sections), thresholds)
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn items(&self) -> &[LessonItem] {
        &self.items
    }

    pub fn responses(&self) -> &[PracticeResponse] {
        &self.responses
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Item awaiting an attempt, `None` once the session is complete
    pub fn current_item(&self) -> Option<&LessonItem> {
        if self.is_complete() {
            None
        } else {
            self.items.get(self.current_index)
        }
    }

    /// Percentage of items already passed
    pub fn progress(&self) -> f64 {
        (self.current_index as f64 / self.items.len() as f64) * 100.0
    }

    /// Apply a scored attempt to the current item
    pub fn submit(&mut self, result: &ComparisonResult) -> Result<Feedback> {
        let item = self
            .current_item()
            .cloned()
            .ok_or_else(|| Error::Session("practice session already completed".to_string()))?;
        let attempts = self.attempt_count + 1;
        let decision = decide(result, &self.thresholds);

        debug!(
            item_id = %item.id,
            similarity = result.similarity,
            is_correct = result.is_correct,
            attempts,
            ?decision,
            "Processed practice attempt"
        );

        let message = match decision {
            Decision::Advance => {
                self.responses.push(PracticeResponse {
                    item_id: item.id.clone(),
                    user_response: result.transcription.clone(),
                    expected_response: item.word.clone(),
                    is_correct: result.is_correct,
                    similarity: result.similarity,
                    attempts,
                });
                self.move_to_next_item();
                "Excellent! That sounded great!".to_string()
            }
            Decision::Retry => {
                self.attempt_count = attempts;
                format!("Try again like this: \"{}\"", item.word)
            }
        };

        Ok(Feedback { decision, message })
    }

    /// Transcribe `audio` against the current item and submit the result
    pub fn attempt(
        &mut self,
        transcriber: &dyn Transcriber,
        audio: &AudioRef,
        language: &str,
    ) -> Result<Feedback> {
        let expected = self
            .current_item()
            .map(|item| item.word.clone())
            .ok_or_else(|| Error::Session("practice session already completed".to_string()))?;
        let result = transcribe_and_validate(transcriber, audio, &expected, language, &self.thresholds)?;
        self.submit(&result)
    }

    fn move_to_next_item(&mut self) {
        self.attempt_count = 0;
        self.current_index += 1;
        if self.current_index >= self.items.len() {
            self.completed_at = Some(Utc::now());
            info!(
                lesson_id = %self.lesson_id,
                accuracy = self.final_accuracy(),
                "Practice session completed"
            );
        }
    }

    /// Rounded percentage of strictly correct responses, 0 with no responses
    pub fn final_accuracy(&self) -> u32 {
        if self.responses.is_empty() {
            return 0;
        }
        let correct = self.responses.iter().filter(|r| r.is_correct).count();
        ((correct as f64 / self.responses.len() as f64) * 100.0).round() as u32
    }

    pub fn is_perfect(&self) -> bool {
        self.final_accuracy() == 100
    }

    pub fn stats(&self) -> AttemptStats {
        let total = self.responses.len() as i64;
        let correct = self.responses.iter().filter(|r| r.is_correct).count() as i64;
        let accuracy = if total > 0 {
            (correct as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        AttemptStats {
            total_attempts: total,
            correct_count: correct,
            incorrect_count: total - correct,
            accuracy_percent: accuracy,
        }
    }

    /// JSON summary of the session for the caller to persist or display
    pub fn summary_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Summary<'a> {
            #[serde(flatten)]
            session: &'a PracticeSession,
            final_accuracy: u32,
            stats: AttemptStats,
        }

        let summary = Summary {
            session: self,
            final_accuracy: self.final_accuracy(),
            stats: self.stats(),
        };
        Ok(serde_json::to_string(&summary)?)
    }
}

// ============= Python Binding =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "should_advance", signature = (similarity, is_correct, lenient_threshold=None))]
pub fn py_should_advance(
    similarity: f64,
    is_correct: bool,
    lenient_threshold: Option<f64>,
) -> PyResult<bool> {
    let mut thresholds = Thresholds::default();
    if let Some(value) = lenient_threshold {
        thresholds = thresholds.with_lenient_accept(value);
    }
    thresholds
        .validate()
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

    let result = ComparisonResult {
        transcription: String::new(),
        similarity,
        is_correct,
    };
    Ok(decide(&result, &thresholds) == Decision::Advance)
}
