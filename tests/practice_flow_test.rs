//! End-to-end practice flow tests
//!
//! These tests drive a full session through a scripted transcriber:
//! - Strict and lenient acceptance
//! - Retry feedback and attempt counting
//! - Transcription failures surfacing before scoring

use std::collections::VecDeque;
use std::sync::Mutex;

use gelato_core::{
    AudioRef, CannedTranscriber, Decision, Error, LessonItem, LessonSection, PracticeSession,
    Result, SectionKind, Thresholds, Transcriber, TranscriptionRequest,
};

/// Replays queued answers; `None` simulates an unreachable provider
struct ScriptedTranscriber {
    answers: Mutex<VecDeque<Option<&'static str>>>,
}

impl ScriptedTranscriber {
    fn new(answers: &[Option<&'static str>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
        }
    }
}

impl Transcriber for ScriptedTranscriber {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn transcribe(&self, _request: &TranscriptionRequest) -> Result<String> {
        match self.answers.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text.to_string()),
            _ => Err(Error::TranscriptionUnavailable("no answer queued".to_string())),
        }
    }
}

fn lesson() -> Vec<LessonSection> {
    vec![
        LessonSection {
            kind: SectionKind::Positive,
            title: "Core Vocabulary".to_string(),
            items: vec![
                LessonItem::new("1", "Hola", "hello"),
                LessonItem::new("2", "agua", "water").with_phonetic("AH-gwah"),
            ],
        },
        LessonSection {
            kind: SectionKind::Awareness,
            title: "Recognition Only".to_string(),
            items: vec![LessonItem::new("3", "tiempo", "time")],
        },
        LessonSection {
            kind: SectionKind::Neutral,
            title: "Additional Context".to_string(),
            items: vec![LessonItem::new("4", "libro", "book")],
        },
    ]
}

#[test]
fn test_full_session() {
    let transcriber = ScriptedTranscriber::new(&[
        Some("hola"),  // exact after lowercasing
        Some("perro"), // far off, retry
        Some("awa"),   // 0.5, retry
        Some("agua"),
        Some("libo"), // 0.8, lenient advance but not correct
    ]);
    let audio = AudioRef::new("mock-audio-url");
    let mut session =
        PracticeSession::from_sections("lesson-1", &lesson(), Thresholds::default()).unwrap();
    assert_eq!(session.items().len(), 3);

    let feedback = session.attempt(&transcriber, &audio, "es").unwrap();
    assert_eq!(feedback.decision, Decision::Advance);

    for _ in 0..2 {
        let feedback = session.attempt(&transcriber, &audio, "es").unwrap();
        assert_eq!(feedback.decision, Decision::Retry);
        assert_eq!(feedback.message, "Try again like this: \"agua\"");
    }

    session.attempt(&transcriber, &audio, "es").unwrap();
    let feedback = session.attempt(&transcriber, &audio, "es").unwrap();
    assert_eq!(feedback.decision, Decision::Advance);
    assert!(session.is_complete());

    let responses = session.responses();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].user_response, "hola");
    assert_eq!(responses[0].expected_response, "Hola");
    assert_eq!(responses[1].attempts, 3);
    assert!(!responses[2].is_correct);
    assert_eq!(responses[2].similarity, 0.8);
    assert_eq!(session.final_accuracy(), 67);
}

#[test]
fn test_transcription_failure_leaves_session_untouched() {
    let transcriber = ScriptedTranscriber::new(&[None, Some("hola")]);
    let audio = AudioRef::new("mock-audio-url");
    let mut session =
        PracticeSession::from_sections("lesson-1", &lesson(), Thresholds::default()).unwrap();

    let err = session.attempt(&transcriber, &audio, "es").unwrap_err();
    assert!(matches!(err, Error::TranscriptionUnavailable(_)));
    assert_eq!(session.current_item().unwrap().id, "1");
    assert!(session.responses().is_empty());

    session.attempt(&transcriber, &audio, "es").unwrap();
    assert_eq!(session.responses()[0].attempts, 1);
}

#[test]
fn test_custom_thresholds_change_acceptance() {
    let transcriber = ScriptedTranscriber::new(&[Some("ola")]);
    let audio = AudioRef::new("mock-audio-url");
    let thresholds = Thresholds::from_json(r#"{"lenient_accept": 0.9}"#).unwrap();
    let mut session = PracticeSession::from_sections("lesson-1", &lesson(), thresholds).unwrap();

    let feedback = session.attempt(&transcriber, &audio, "es").unwrap();
    assert_eq!(feedback.decision, Decision::Retry);
}

#[test]
fn test_canned_transcriber_drives_session() {
    let items = vec![LessonItem::new("1", "Hasta luego", "see you later")];
    let transcriber = CannedTranscriber::new(["Hasta luego"]);
    let mut session = PracticeSession::new("lesson-2", items, Thresholds::default()).unwrap();

    let feedback = session
        .attempt(&transcriber, &AudioRef::new("mock-audio-url"), "es")
        .unwrap();
    assert_eq!(feedback.decision, Decision::Advance);
    assert!(session.is_perfect());
}
