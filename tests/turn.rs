//! Turn controller state-machine tests
//!
//! Exercises the full pipeline against mock collaborators, without audio
//! hardware or network access.

mod common;

use common::{MockResponder, MockSynthesizer, MockTranscriber, clip};
use voxchat::{ChatModel, Error, Session, SkipReason, TurnController, TurnOutcome};

fn controller_ok(transcript: &str, reply: &str) -> TurnController {
    let (stt, _) = MockTranscriber::ok(transcript);
    let (chat, _) = MockResponder::ok(reply);
    let (tts, _) = MockSynthesizer::ok();
    TurnController::new(
        Box::new(stt),
        Box::new(chat),
        Box::new(tts),
        ChatModel::HighCapability,
    )
}

#[tokio::test]
async fn successful_turns_keep_lockstep_and_alternation() {
    let mut controller = controller_ok("hello", "hi there");
    let mut session = Session::new();

    for id in 0..3 {
        let outcome = controller.process(&mut session, Some(&clip(id, 2.0))).await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Completed(_)));
    }

    assert_eq!(session.len(), 6);
    assert_eq!(session.turns().len(), session.history().len());
    for (i, msg) in session.history().iter().enumerate() {
        let expected = if i % 2 == 0 { "user" } else { "assistant" };
        assert_eq!(msg.role, expected);
    }
}

#[tokio::test]
async fn no_capture_is_a_noop() {
    let mut controller = controller_ok("hello", "hi");
    let mut session = Session::new();

    let outcome = controller.process(&mut session, None).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Skipped(SkipReason::NoCapture)));
    assert!(session.is_empty());
}

#[tokio::test]
async fn zero_duration_capture_never_produces_a_turn() {
    let mut controller = controller_ok("hello", "hi");
    let mut session = Session::new();

    let outcome = controller.process(&mut session, Some(&clip(0, 0.0))).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Skipped(SkipReason::EmptyCapture)));
    assert!(session.is_empty());
}

#[tokio::test]
async fn same_clip_never_produces_a_second_turn() {
    let mut controller = controller_ok("hello", "hi");
    let mut session = Session::new();
    let c = clip(0, 2.0);

    let first = controller.process(&mut session, Some(&c)).await.unwrap();
    assert!(matches!(first, TurnOutcome::Completed(_)));
    assert_eq!(session.len(), 2);

    // Re-evaluation with the same pending clip
    let second = controller.process(&mut session, Some(&c)).await.unwrap();
    assert!(matches!(second, TurnOutcome::Skipped(SkipReason::AlreadyProcessed)));
    assert_eq!(session.len(), 2);
}

#[tokio::test]
async fn transcriber_failure_leaves_session_unchanged() {
    let (chat, requests) = MockResponder::ok("hi");
    let (tts, tts_calls) = MockSynthesizer::ok();
    let mut controller = TurnController::new(
        Box::new(MockTranscriber::failing()),
        Box::new(chat),
        Box::new(tts),
        ChatModel::HighCapability,
    );
    let mut session = Session::new();

    let err = controller.process(&mut session, Some(&clip(0, 2.0))).await.unwrap_err();
    assert!(matches!(err, Error::Stt(_)));
    assert!(session.is_empty());

    // No reply was requested and nothing was synthesized
    assert!(requests.lock().unwrap().is_empty());
    assert_eq!(tts_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn responder_failure_records_only_the_user_turn() {
    let (stt, _) = MockTranscriber::ok("what time is it?");
    let (tts, tts_calls) = MockSynthesizer::ok();
    let mut controller = TurnController::new(
        Box::new(stt),
        Box::new(MockResponder::failing()),
        Box::new(tts),
        ChatModel::HighCapability,
    );
    let mut session = Session::new();

    let err = controller.process(&mut session, Some(&clip(0, 2.0))).await.unwrap_err();
    assert!(matches!(err, Error::Chat(_)));

    // Exactly one more user turn than assistant turn, no assistant turn added
    assert_eq!(session.len(), 1);
    assert_eq!(session.history()[0].role, "user");
    assert_eq!(tts_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn synthesizer_failure_still_records_the_reply_text() {
    let (stt, _) = MockTranscriber::ok("hello");
    let (chat, _) = MockResponder::ok("hi there");
    let mut controller = TurnController::new(
        Box::new(stt),
        Box::new(chat),
        Box::new(MockSynthesizer::failing()),
        ChatModel::HighCapability,
    );
    let mut session = Session::new();

    let outcome = controller.process(&mut session, Some(&clip(0, 2.0))).await.unwrap();
    let TurnOutcome::Completed(turn) = outcome else {
        panic!("expected completed turn");
    };

    assert!(turn.audio_html.is_none());
    assert_eq!(session.len(), 2);
    assert_eq!(session.history()[1].role, "assistant");
    assert!(turn.transcript_html.contains("hi there"));
}

#[tokio::test]
async fn reset_clears_state_and_suppresses_exactly_one_cycle() {
    let mut controller = controller_ok("hello", "hi");
    let mut session = Session::new();

    controller.process(&mut session, Some(&clip(0, 2.0))).await.unwrap();
    assert_eq!(session.len(), 2);

    controller.reset(&mut session);
    assert!(session.is_empty());
    assert!(session.history().is_empty());

    // Next cycle with a pending clip is ignored once
    let pending = clip(1, 2.0);
    let suppressed = controller.process(&mut session, Some(&pending)).await.unwrap();
    assert!(matches!(suppressed, TurnOutcome::Skipped(SkipReason::ResetCycle)));
    assert!(session.is_empty());

    // Then the same pending clip processes normally
    let outcome = controller.process(&mut session, Some(&pending)).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Completed(_)));
    assert_eq!(session.len(), 2);
}

#[tokio::test]
async fn scenario_fast_cheap_turn_emits_one_audio_fragment() {
    let (stt, _) = MockTranscriber::ok("What time is it?");
    let (chat, requests) = MockResponder::ok("I don't have real-time access.");
    let (tts, tts_calls) = MockSynthesizer::ok();
    let mut controller = TurnController::new(
        Box::new(stt),
        Box::new(chat),
        Box::new(tts),
        ChatModel::FastCheap,
    );
    let mut session = Session::new();

    let outcome = controller.process(&mut session, Some(&clip(0, 3.0))).await.unwrap();
    let TurnOutcome::Completed(turn) = outcome else {
        panic!("expected completed turn");
    };

    assert_eq!(turn.transcript, "What time is it?");
    assert_eq!(turn.reply, "I don't have real-time access.");
    assert_eq!(session.len(), 2);
    assert_eq!(session.history().len(), 2);

    // The responder saw the fast-cheap model and the user turn
    assert_eq!(requests.lock().unwrap().as_slice(), &[(ChatModel::FastCheap, 1)]);

    // Exactly one autoplay fragment
    assert_eq!(tts_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    let audio = turn.audio_html.expect("audio fragment");
    assert!(audio.contains("autoplay"));
    assert!(audio.contains("base64,"));
}

#[tokio::test]
async fn model_change_resends_history_unchanged() {
    let (stt, _) = MockTranscriber::ok("hello");
    let (chat, requests) = MockResponder::ok("hi");
    let (tts, _) = MockSynthesizer::ok();
    let mut controller = TurnController::new(
        Box::new(stt),
        Box::new(chat),
        Box::new(tts),
        ChatModel::FastCheap,
    );
    let mut session = Session::new();

    controller.process(&mut session, Some(&clip(0, 1.0))).await.unwrap();
    controller.set_model(ChatModel::HighCapability);
    controller.process(&mut session, Some(&clip(1, 1.0))).await.unwrap();

    // Second call saw the new model and the full three-message history
    // (user, assistant, user) built under the old one
    let requests = requests.lock().unwrap();
    assert_eq!(requests.as_slice(), &[
        (ChatModel::FastCheap, 1),
        (ChatModel::HighCapability, 3),
    ]);
}

#[tokio::test]
async fn failed_turn_is_not_retried_on_reevaluation() {
    let (chat, _) = MockResponder::ok("hi");
    let (tts, _) = MockSynthesizer::ok();
    let stt = MockTranscriber::failing();
    let stt_calls = std::sync::Arc::clone(&stt.calls);
    let mut controller = TurnController::new(
        Box::new(stt),
        Box::new(chat),
        Box::new(tts),
        ChatModel::HighCapability,
    );
    let mut session = Session::new();
    let c = clip(0, 2.0);

    assert!(controller.process(&mut session, Some(&c)).await.is_err());

    // Re-evaluation with the same clip does not call the transcriber again
    let outcome = controller.process(&mut session, Some(&c)).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Skipped(SkipReason::AlreadyProcessed)));
    assert_eq!(stt_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}
