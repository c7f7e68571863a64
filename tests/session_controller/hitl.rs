use std::fs;

use crate::session_harness::{
    Fixture, PASS_VERDICT, ScriptedModel, Stage, assert_valid_path, settings,
};
use story_studio::controller::StaticFeedback;
use story_studio::memory::PreferenceMemory;
use story_studio::session::StoryState;

#[tokio::test]
async fn feedback_updates_memory_and_revises_final_story() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[PASS_VERDICT]);
    let feedback = "make it shorter and calmer, with a recurring character named Luna";

    let outcome = fixture
        .controller(&model, settings(2, true))
        .with_feedback(StaticFeedback::new(feedback))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    let stored = fixture.preferences().load().unwrap();
    assert_eq!(stored.preferred_length.as_deref(), Some("short"));
    assert_eq!(stored.preferred_tone.as_deref(), Some("calmer"));
    assert_eq!(stored.recurring_character.as_deref(), Some("Luna"));

    let session = &outcome.session;
    assert_eq!(session.user_feedback.as_deref(), Some(feedback));
    assert_eq!(session.drafts, vec!["Story draft #1", "Revised story #1"]);
    assert_eq!(outcome.final_story, "Revised story #1");
    assert_eq!(session.state, StoryState::Finalized);
    assert_valid_path(session);

    let hitl = model.calls_for(Stage::Reviser).remove(0);
    assert!(hitl.prompt.contains(&format!("- User feedback: {feedback}")));
    assert!(hitl.prompt.contains("keeping the story safe and age-appropriate"));
    assert!(hitl.prompt.contains("Do not add scary elements. Keep a cozy bedtime ending."));
    assert!(hitl.prompt.contains("Story draft #1"));
    assert!((hitl.temperature - 0.35).abs() < f64::EPSILON);

    assert_eq!(fixture.events.span_names().last().unwrap(), "hitl_reviser");
    let metrics = session.metrics.as_ref().unwrap();
    assert_eq!(metrics.counters["hitl.feedback"], 1);
    assert_eq!(metrics.counters["memory.updated"], 1);
}

#[tokio::test]
async fn blank_feedback_changes_nothing() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, true))
        .with_feedback(StaticFeedback::new("   "))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    assert!(!fixture.preferences().path().exists());
    assert!(outcome.session.user_feedback.is_none());
    assert_eq!(outcome.final_story, "Story draft #1");
    assert!(model.calls_for(Stage::Reviser).is_empty());
    assert!(
        !outcome
            .session
            .metrics
            .unwrap()
            .counters
            .contains_key("hitl.feedback")
    );
}

#[tokio::test]
async fn disabled_hitl_never_asks_for_feedback() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, false))
        .with_feedback(StaticFeedback::new("shorter please"))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    assert!(outcome.session.user_feedback.is_none());
    assert!(!fixture.preferences().path().exists());
    assert!(!fixture.events.span_names().contains(&"hitl_reviser".to_string()));
}

#[tokio::test]
async fn feedback_without_preferences_still_revises_but_saves_nothing() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, true))
        .with_feedback(StaticFeedback::new("add a lullaby at the end"))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    assert_eq!(outcome.final_story, "Revised story #1");
    assert!(!fixture.preferences().path().exists());
    let metrics = outcome.session.metrics.unwrap();
    assert_eq!(metrics.counters["hitl.feedback"], 1);
    assert!(!metrics.counters.contains_key("memory.updated"));
}

#[tokio::test]
async fn stored_preferences_reach_the_interpreter() {
    let fixture = Fixture::new();
    fixture
        .preferences()
        .save(&PreferenceMemory {
            preferred_length: Some("short".into()),
            recurring_character: Some("Luna".into()),
            ..PreferenceMemory::default()
        })
        .unwrap();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    fixture
        .controller(&model, settings(2, false))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    let interpreter = model.calls_for(Stage::Interpreter).remove(0);
    assert!(
        interpreter
            .prompt
            .contains("preferred_length=short, recurring_character=Luna")
    );
}

#[tokio::test]
async fn empty_memory_renders_as_none() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    fixture
        .controller(&model, settings(2, false))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    let interpreter = model.calls_for(Stage::Interpreter).remove(0);
    assert!(interpreter.prompt.contains("safety overrides preferences):\n(none)"));
}

#[tokio::test]
async fn feedback_accumulates_across_sessions() {
    let fixture = Fixture::new();

    let first = ScriptedModel::new(&[PASS_VERDICT]);
    fixture
        .controller(&first, settings(2, true))
        .with_feedback(StaticFeedback::new("a character named Pip"))
        .run_session("a hedgehog story")
        .await
        .unwrap();

    let second = ScriptedModel::new(&[PASS_VERDICT]);
    fixture
        .controller(&second, settings(2, true))
        .with_feedback(StaticFeedback::new("more humor"))
        .run_session("a hedgehog story")
        .await
        .unwrap();

    let stored = fixture.preferences().load().unwrap();
    assert_eq!(stored.recurring_character.as_deref(), Some("Pip"));
    assert_eq!(stored.preferred_tone.as_deref(), Some("funnier"));
    assert!(
        second
            .calls_for(Stage::Interpreter)
            .remove(0)
            .prompt
            .contains("recurring_character=Pip")
    );
}

#[tokio::test]
async fn unreadable_preferences_are_never_overwritten() {
    let fixture = Fixture::new();
    let path = fixture.preferences().path().to_path_buf();
    let original = r#"{"preferred_length": 5, "recurring_character": "Pip"}"#;
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, original).unwrap();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, true))
        .with_feedback(StaticFeedback::new("make it calmer"))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(outcome.final_story, "Revised story #1");
    assert!(
        model
            .calls_for(Stage::Interpreter)
            .remove(0)
            .prompt
            .contains("safety overrides preferences):\n(none)")
    );
    let metrics = outcome.session.metrics.unwrap();
    assert_eq!(metrics.counters["memory.save_skipped"], 1);
    assert!(!metrics.counters.contains_key("memory.updated"));
}
