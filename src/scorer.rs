//! Edit-distance similarity scoring for pronunciation practice

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::thresholds::Thresholds;

/// A transcription to compare against the expected practice text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub transcription: String,
    pub expected: String,
    /// Language tag of the practice item, informational only
    pub language: String,
}

impl ComparisonInput {
    pub fn new(
        transcription: impl Into<String>,
        expected: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            transcription: transcription.into(),
            expected: expected.into(),
            language: language.into(),
        }
    }

    pub fn evaluate(&self, thresholds: &Thresholds) -> ComparisonResult {
        validate_transcription(&self.transcription, &self.expected, thresholds)
    }
}

/// Outcome of comparing a transcription with the expected text
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Raw transcription as returned by the speech-to-text provider
    pub transcription: String,
    pub similarity: f64,
    pub is_correct: bool,
}

#[cfg(feature = "python")]
#[pymethods]
impl ComparisonResult {
    fn __repr__(&self) -> String {
        format!(
            "ComparisonResult(transcription='{}', similarity={:.2}, is_correct={})",
            self.transcription, self.similarity, self.is_correct
        )
    }
}

/// Minimum number of single-character insertions, deletions or substitutions
/// turning `a` into `b`. Lengths are counted in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // matrix[j][i] = distance between the first i chars of `a` and the first j chars of `b`
    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, cell) in matrix[0].iter_mut().enumerate() {
        *cell = i;
    }
    for (j, row) in matrix.iter_mut().enumerate() {
        row[0] = j;
    }

    for j in 1..=b.len() {
        for i in 1..=a.len() {
            let indicator = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[j][i] = (matrix[j][i - 1] + 1)
                .min(matrix[j - 1][i] + 1)
                .min(matrix[j - 1][i - 1] + indicator);
        }
    }

    matrix[b.len()][a.len()]
}

/// Similarity in `[0, 1]` relative to the longer string's length.
///
/// Case-sensitive; callers lowercase first when they want otherwise.
/// Two empty strings are a perfect match.
pub fn similarity(text1: &str, text2: &str) -> f64 {
    let len1 = text1.chars().count();
    let len2 = text2.chars().count();
    let (longer, shorter, longer_len) = if len1 > len2 {
        (text1, text2, len1)
    } else {
        (text2, text1, len2)
    };

    if longer_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(longer, shorter);
    (longer_len - distance) as f64 / longer_len as f64
}

/// Score a transcription against the expected text, ignoring case.
///
/// `is_correct` is always `similarity > thresholds.strict_correct`.
pub fn validate_transcription(
    transcription: &str,
    expected: &str,
    thresholds: &Thresholds,
) -> ComparisonResult {
    let similarity = similarity(&transcription.to_lowercase(), &expected.to_lowercase());

    ComparisonResult {
        transcription: transcription.to_string(),
        similarity,
        is_correct: similarity > thresholds.strict_correct,
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "levenshtein_distance")]
pub fn py_levenshtein_distance(a: &str, b: &str) -> usize {
    levenshtein_distance(a, b)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "similarity")]
pub fn py_similarity(text1: &str, text2: &str) -> f64 {
    similarity(text1, text2)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "validate_transcription", signature = (transcription, expected, strict_threshold=None))]
pub fn py_validate_transcription(
    transcription: &str,
    expected: &str,
    strict_threshold: Option<f64>,
) -> PyResult<ComparisonResult> {
    let mut thresholds = Thresholds::default();
    if let Some(value) = strict_threshold {
        thresholds = thresholds.with_strict_correct(value);
    }
    thresholds
        .validate()
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    Ok(validate_transcription(transcription, expected, &thresholds))
}
