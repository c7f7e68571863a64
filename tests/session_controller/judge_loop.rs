use crate::session_harness::{
    Fixture, PASS_VERDICT, REVISE_VERDICT, REWRITE_VERDICT, ScriptedModel, Stage,
    assert_valid_path, settings,
};
use story_studio::controller::SessionSettings;
use story_studio::session::StoryState;

#[tokio::test]
async fn first_passing_verdict_finalizes_the_first_draft() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, false))
        .run_session("a cat who finds a home")
        .await
        .unwrap();

    let session = &outcome.session;
    assert_eq!(
        fixture.events.span_names(),
        vec!["interpreter", "planner", "storyteller", "judge"]
    );
    assert_eq!(session.drafts, vec!["Story draft #1"]);
    assert_eq!(session.judge_reports.len(), 1);
    assert!(session.judge_reports[0].pass);
    assert_eq!(outcome.final_story, "Story draft #1");
    assert_eq!(session.state, StoryState::Finalized);
    assert_valid_path(session);

    let metrics = session.metrics.as_ref().unwrap();
    assert_eq!(metrics.counters["judge.calls"], 1);
    assert_eq!(metrics.counters["judge.pass"], 1);
    assert!(!metrics.counters.contains_key("loop.exhausted"));
    assert!((metrics.gauges["score.coziness"] - 9.0).abs() < f64::EPSILON);
    assert!((metrics.gauges["loop.iterations"] - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn exhausted_loop_accepts_the_last_draft() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[REVISE_VERDICT, REVISE_VERDICT, REVISE_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, false))
        .run_session("a sleepy owl")
        .await
        .unwrap();

    let session = &outcome.session;
    assert_eq!(
        fixture.events.span_names(),
        vec![
            "interpreter",
            "planner",
            "storyteller",
            "judge",
            "reviser",
            "judge",
            "reviser",
            "judge"
        ]
    );
    assert_eq!(session.drafts.len(), 3);
    assert_eq!(session.judge_reports.len(), 3);
    assert_eq!(outcome.final_story, *session.drafts.last().unwrap());
    assert_eq!(outcome.final_story, "Revised story #2");
    assert_eq!(model.calls_for(Stage::Storyteller).len(), 1);
    assert_valid_path(session);

    let metrics = session.metrics.as_ref().unwrap();
    assert_eq!(metrics.counters["loop.exhausted"], 1);
    assert_eq!(metrics.counters["judge.calls"], 3);
    assert!((metrics.gauges["loop.iterations"] - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn revised_draft_is_judged_without_redrafting() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[REVISE_VERDICT, PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, false))
        .run_session("a moon story")
        .await
        .unwrap();

    let judges = model.calls_for(Stage::Judge);
    assert_eq!(judges.len(), 2);
    assert!(judges[0].prompt.contains("Story draft #1"));
    assert!(judges[1].prompt.contains("Revised story #1"));

    let path = outcome.session.state_path();
    assert!(path.ends_with(&[
        StoryState::Judged,
        StoryState::Revising,
        StoryState::Revised,
        StoryState::Judging,
        StoryState::Judged,
        StoryState::Finalized,
    ]));
    assert_eq!(
        path.iter().filter(|s| **s == StoryState::Drafting).count(),
        1
    );
}

#[tokio::test]
async fn pass_on_second_verdict_stops_the_loop() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[REVISE_VERDICT, PASS_VERDICT, REVISE_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(5, false))
        .run_session("a bunny picnic")
        .await
        .unwrap();

    assert_eq!(
        fixture.events.span_names(),
        vec!["interpreter", "planner", "storyteller", "judge", "reviser", "judge"]
    );
    assert_eq!(outcome.session.judge_reports.len(), 2);
    assert_eq!(outcome.final_story, "Revised story #1");
    assert_eq!(outcome.session.metrics.unwrap().counters["judge.pass"], 1);
}

#[tokio::test]
async fn prose_verdict_routes_to_targeted_revision() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&["This story is lovely and very calm.", PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, false))
        .run_session("a whale lullaby")
        .await
        .unwrap();

    let spans = fixture.events.span_names();
    assert!(spans.contains(&"reviser".to_string()));
    assert!(!spans.contains(&"rewrite".to_string()));

    let degraded = &outcome.session.judge_reports[0];
    assert!(!degraded.pass);
    assert!(!degraded.rewrite_required);

    let revisions = model.calls_for(Stage::Reviser);
    assert_eq!(revisions.len(), 1);
    assert!(revisions[0].prompt.contains("Story draft #1"));

    let metrics = outcome.session.metrics.unwrap();
    assert_eq!(metrics.counters["judge.malformed"], 1);
    assert_eq!(metrics.counters["judge.calls"], 2);
}

#[tokio::test]
async fn rewrite_verdict_regenerates_from_spec_and_plan() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[REWRITE_VERDICT, PASS_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(2, false))
        .run_session("a dragon bakes bread")
        .await
        .unwrap();

    assert_eq!(
        fixture.events.span_names(),
        vec!["interpreter", "planner", "storyteller", "judge", "rewrite", "judge"]
    );

    let drafts = model.calls_for(Stage::Storyteller);
    assert_eq!(drafts.len(), 2);
    let rewrite = &drafts[1];
    assert!(!rewrite.prompt.contains("Story draft #1"));
    assert!(rewrite.prompt.contains("Theme: a cat finds a home"));
    assert_eq!(rewrite.max_tokens, 2200);
    assert!((rewrite.temperature - 0.2).abs() < f64::EPSILON);

    assert_eq!(outcome.final_story, "Story draft #2");
    let metrics = outcome.session.metrics.unwrap();
    assert_eq!(metrics.counters["judge.rewrite_required"], 1);
}

#[tokio::test]
async fn zero_iterations_finalizes_after_one_judge() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[REVISE_VERDICT]);

    let outcome = fixture
        .controller(&model, settings(0, false))
        .run_session("a quiet forest")
        .await
        .unwrap();

    assert_eq!(outcome.session.drafts.len(), 1);
    assert_eq!(outcome.final_story, "Story draft #1");
    assert_eq!(outcome.session.metrics.unwrap().counters["loop.exhausted"], 1);
}

#[tokio::test]
async fn each_stage_uses_its_budget() {
    let fixture = Fixture::new();
    let model = ScriptedModel::new(&[REVISE_VERDICT, PASS_VERDICT]);
    let settings = SessionSettings {
        base_temperature: 0.6,
        ..settings(2, false)
    };

    fixture
        .controller(&model, settings)
        .run_session("a snowy night")
        .await
        .unwrap();

    let budget = |stage: Stage| {
        let call = model.calls_for(stage).remove(0);
        (call.max_tokens, call.temperature)
    };
    assert_eq!(budget(Stage::Interpreter), (800, 0.2));
    assert_eq!(budget(Stage::Planner), (700, 0.2));
    assert_eq!(budget(Stage::Storyteller), (2200, 0.6));
    assert_eq!(budget(Stage::Judge), (800, 0.0));
    assert_eq!(budget(Stage::Reviser), (2200, 0.25));
}
