//! Gelato Core - pronunciation practice scoring
//!
//! Provides edit-distance similarity scoring, the transcribe-and-validate step,
//! and the practice-session flow built on top of it.

pub mod error;
pub mod scorer;
pub mod session;
pub mod thresholds;
pub mod transcriber;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub use error::{Error, Result};
pub use scorer::{levenshtein_distance, similarity, validate_transcription, ComparisonInput, ComparisonResult};
pub use session::{decide, practice_items, AttemptStats, Decision, Feedback, LessonItem, LessonSection, PracticeResponse, PracticeSession, SectionKind};
pub use thresholds::{Thresholds, LENIENT_ACCEPT_THRESHOLD, STRICT_CORRECT_THRESHOLD};
pub use transcriber::{transcribe_and_validate, AudioRef, CannedTranscriber, Transcriber, TranscriptionRequest};

/// Gelato Core Python Module
#[cfg(feature = "python")]
#[pymodule]
fn gelato_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Scoring
    m.add_function(wrap_pyfunction!(scorer::py_levenshtein_distance, m)?)?;
    m.add_function(wrap_pyfunction!(scorer::py_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(scorer::py_validate_transcription, m)?)?;

    // Practice flow
    m.add_function(wrap_pyfunction!(session::py_should_advance, m)?)?;

    m.add("STRICT_CORRECT_THRESHOLD", STRICT_CORRECT_THRESHOLD)?;
    m.add("LENIENT_ACCEPT_THRESHOLD", LENIENT_ACCEPT_THRESHOLD)?;

    // Register classes
    m.add_class::<scorer::ComparisonResult>()?;
    m.add_class::<session::AttemptStats>()?;

    Ok(())
}
