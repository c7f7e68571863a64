use super::engine::TeraEngine;
use super::rubric::{HARD_SAFETY, QUALITY_DIMENSIONS, SCORE_KEYS};
use tera::Context;

const INTERPRETER_TEMPLATE: &str = "\
You are an intent interpreter for a bedtime-story system.

Task: Convert the user's request into a *Story Request Spec*.
The user prompt is underspecified; infer missing constraints for bedtime stories for ages 5–10.

User request:
{{ user_request }}

Known user preferences (optional; safety overrides preferences):
{{ preferences }}

Output format:
Story Request Spec:
- Theme:
- Main character(s):
- Setting:
- Tone (must be calming):
- Length target (short/medium/long):
- Must-include (1–3 items):
- Must-avoid (hard safety constraints):
- Notes on cultural interpretation (if applicable):
";

const PLANNER_TEMPLATE: &str = "\
You are a story planner for a bedtime story (ages 5–10).
Create a simple, cozy outline with a gentle arc.

Constraints:
- Keep conflict mild and non-scary.
- One clear main thread; no complex twists.
- End with emotional closure and a bedtime wind-down scene.

Request Spec:
{{ request_spec }}

Output as 6–8 bullet points:
1) Hook
2) Character + want
3) Gentle obstacle
4) Helper / coping strategy
5) Progress
6) Resolution
7) Wind-down bedtime moment
";

const STORYTELLER_TEMPLATE: &str = "\
You are a bedtime storyteller for children ages 5–10.

Hard safety constraints (must obey):
{% for rule in hard_safety %}- {{ rule }}
{% endfor %}
Style constraints:
- Calm, warm, reassuring.
- Simple language; short paragraphs.
- Gentle humor is OK, but keep arousal low.
- Clear beginning-middle-end; end with closure and sleepiness.

Request Spec:
{{ request_spec }}

Plan:
{{ plan }}

Write the full story (about 600–900 words).
";

const JUDGE_TEMPLATE: &str = "\
You are a conservative evaluator (LLM Judge) for AI-generated bedtime stories for children ages 5–10.

You MUST output a single JSON object. No extra text.

Hard safety constraints (gating):
{% for rule in hard_safety %}- {{ rule }}
{% endfor %}
Soft quality dimensions (graded):
{% for dimension in quality_dimensions %}- {{ dimension }}
{% endfor %}
Task:
1) Identify any hard safety violations.
2) Evaluate the story along the soft dimensions.
3) Decide:
   - pass: true only if no hard violations AND overall quality is suitable for bedtime.
   - rewrite_required: true if there is any hard violation OR the story is too scary/stimulating for bedtime.
4) Provide actionable revision instructions.

Return JSON with this schema:
{
  \"hard_flags\": [\"...\"],
  \"pass\": true/false,
  \"rewrite_required\": true/false,
  \"scores\": {
{% for key in score_keys %}    \"{{ key }}\": 0-10{% if not loop.last %},{% endif %}
{% endfor %}  },
  \"issues\": [\"...\"],
  \"revision_instructions\": [\"...\"],
  \"one_sentence_verdict\": \"...\"
}

Request Spec:
{{ request_spec }}

Story:
{{ story }}
";

const REVISER_TEMPLATE: &str = "\
You are a reviser for a bedtime story for children ages 5–10.

Goal: Produce a safer, calmer, clearer bedtime story.
Rules:
- Do NOT introduce new major plot elements, new villains, or new threats.
- Reduce arousal; soften conflict; increase reassurance.
- Preserve the user's theme and keep the story coherent.

Request Spec:
{{ request_spec }}

Revision instructions:
{% for instruction in instructions %}- {{ instruction }}
{% endfor %}
Original story:
{{ story }}

Return the revised full story only.
";

const INTERPRETER_NAME: &str = "interpreter";
const PLANNER_NAME: &str = "planner";
const STORYTELLER_NAME: &str = "storyteller";
const JUDGE_NAME: &str = "judge";
const REVISER_NAME: &str = "reviser";

/// Builds the prompt for each pipeline stage.
pub struct StoryPrompts {
    engine: TeraEngine,
}

impl StoryPrompts {
    pub fn new() -> anyhow::Result<Self> {
        let mut engine = TeraEngine::new();
        engine.add_template(INTERPRETER_NAME, INTERPRETER_TEMPLATE)?;
        engine.add_template(PLANNER_NAME, PLANNER_TEMPLATE)?;
        engine.add_template(STORYTELLER_NAME, STORYTELLER_TEMPLATE)?;
        engine.add_template(JUDGE_NAME, JUDGE_TEMPLATE)?;
        engine.add_template(REVISER_NAME, REVISER_TEMPLATE)?;
        Ok(Self { engine })
    }

    /// Turn the raw request plus rendered preferences into a request spec prompt.
    pub fn interpreter(&self, user_request: &str, preferences: &str) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("user_request", user_request);
        ctx.insert("preferences", preferences);
        self.render(INTERPRETER_NAME, &ctx)
    }

    pub fn planner(&self, request_spec: &str) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("request_spec", request_spec);
        self.render(PLANNER_NAME, &ctx)
    }

    /// Fresh draft from spec and plan. Also used for full rewrites, which
    /// must not see the rejected draft.
    pub fn storyteller(&self, request_spec: &str, plan: &str) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("hard_safety", &HARD_SAFETY);
        ctx.insert("request_spec", request_spec);
        ctx.insert("plan", plan);
        self.render(STORYTELLER_NAME, &ctx)
    }

    pub fn judge(&self, request_spec: &str, story: &str) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("hard_safety", &HARD_SAFETY);
        ctx.insert("quality_dimensions", &QUALITY_DIMENSIONS);
        ctx.insert("score_keys", &SCORE_KEYS);
        ctx.insert("request_spec", request_spec);
        ctx.insert("story", story);
        self.render(JUDGE_NAME, &ctx)
    }

    /// Targeted edit of `story` keyed to `instructions`.
    pub fn reviser(
        &self,
        request_spec: &str,
        story: &str,
        instructions: &[String],
    ) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("request_spec", request_spec);
        ctx.insert("story", story);
        ctx.insert("instructions", instructions);
        self.render(REVISER_NAME, &ctx)
    }

    fn render(&self, name: &str, ctx: &Context) -> anyhow::Result<String> {
        Ok(self.engine.render(name, ctx)?.trim().to_string())
    }
}
