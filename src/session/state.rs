use serde::{Deserialize, Serialize};

/// Pipeline stage labels. Transitions are only legal along the table in
/// [`StoryState::allowed_next`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StoryState {
    Init,
    Interpreting,
    Interpreted,
    Planning,
    Planned,
    Drafting,
    Drafted,
    Judging,
    Judged,
    Revising,
    Revised,
    Finalized,
}

impl StoryState {
    pub fn allowed_next(self) -> &'static [StoryState] {
        match self {
            Self::Init => &[Self::Interpreting],
            Self::Interpreting => &[Self::Interpreted],
            Self::Interpreted => &[Self::Planning],
            Self::Planning => &[Self::Planned],
            Self::Planned => &[Self::Drafting],
            Self::Drafting => &[Self::Drafted],
            Self::Drafted => &[Self::Judging],
            Self::Judging => &[Self::Judged],
            Self::Judged => &[Self::Finalized, Self::Revising],
            Self::Revising => &[Self::Revised],
            // revised text is judged directly, the draft prompt does not re-run
            Self::Revised => &[Self::Judging],
            Self::Finalized => &[],
        }
    }

    pub fn can_transition_to(self, next: StoryState) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}
