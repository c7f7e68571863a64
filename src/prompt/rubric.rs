/// Hard constraints. Any violation gates the story and forces a rewrite.
pub const HARD_SAFETY: [&str; 4] = [
    "No graphic violence, gore, death, self-harm, or sexual content.",
    "No explicit threats, torture, or horror framing.",
    "No hate/harassment; avoid stereotypes; be inclusive.",
    "No medical/legal/financial advice; this is fiction for kids.",
];

/// Graded quality dimensions the judge scores.
pub const QUALITY_DIMENSIONS: [&str; 6] = [
    "Age-appropriate language for 5–10 (simple sentences, explain unfamiliar ideas).",
    "Low arousal: calming tone, gentle conflict, de-escalating emotional arc.",
    "Predictable structure: clear beginning-middle-end with closure.",
    "Cozy sensory detail + reassurance; ending includes a wind-down/bedtime ritual.",
    "Intent alignment: honors user's theme while staying safe and bedtime-appropriate.",
    "Cultural sensitivity: interpret ambiguous motifs (e.g., dragons) in a non-threatening, prosocial way.",
];

/// Score keys the judge is asked to emit.
pub const SCORE_KEYS: [&str; 6] = [
    "age_fit",
    "coziness",
    "low_arousal",
    "structure",
    "cultural_ethics",
    "intent_alignment",
];
