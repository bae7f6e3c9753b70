use advisor_persona::{PersonaResponder, ScriptedResponder};
use advisor_types::{ConfidenceLevel, IntentSignal, TranscriptEntry, Urgency};

#[tokio::test]
async fn test_replies_quote_the_caller() {
    let responder = ScriptedResponder::new();
    let intent = IntentSignal::neutral(ConfidenceLevel::High);

    let reply = responder
        .respond("I want to start a podcast.", &intent, &[])
        .await
        .unwrap();
    assert!(reply.contains("I want to start a podcast"));
}

#[tokio::test]
async fn test_replies_are_deterministic() {
    let responder = ScriptedResponder::new();
    let mut intent = IntentSignal::neutral(ConfidenceLevel::Medium);
    intent.urgency = Urgency::High;

    let first = responder.respond("Cash is tight", &intent, &[]).await.unwrap();
    let again = responder.respond("Cash is tight", &intent, &[]).await.unwrap();
    assert_eq!(first, again);
}

#[tokio::test]
async fn test_templates_rotate_with_assistant_turns() {
    let responder = ScriptedResponder::new();
    let mut intent = IntentSignal::neutral(ConfidenceLevel::High);
    intent.is_decision_request = true;

    let opening = responder.respond("Should I hire?", &intent, &[]).await.unwrap();
    let history = vec![
        TranscriptEntry::assistant("Hi."),
        TranscriptEntry::caller("Should I hire?"),
    ];
    let next = responder
        .respond("Should I hire?", &intent, &history)
        .await
        .unwrap();
    assert_ne!(opening, next);

    // Caller turns alone do not advance the rotation.
    let caller_only = vec![TranscriptEntry::caller("Hello")];
    let same = responder
        .respond("Should I hire?", &intent, &caller_only)
        .await
        .unwrap();
    assert_eq!(opening, same);
}
