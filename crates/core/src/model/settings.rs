/// Behaviour switches for a quiz session.
///
/// - `study_mode`: every question reveals its answer as soon as it is shown,
///   and answers can no longer be changed.
/// - `auto_reveal`: a choice question reveals its answer right after an
///   option is picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuizSettings {
    study_mode: bool,
    auto_reveal: bool,
}

impl QuizSettings {
    #[must_use]
    pub fn new(study_mode: bool, auto_reveal: bool) -> Self {
        Self {
            study_mode,
            auto_reveal,
        }
    }

    #[must_use]
    pub fn with_study_mode(mut self, enabled: bool) -> Self {
        self.study_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_auto_reveal(mut self, enabled: bool) -> Self {
        self.auto_reveal = enabled;
        self
    }

    #[must_use]
    pub fn study_mode(&self) -> bool {
        self.study_mode
    }

    #[must_use]
    pub fn auto_reveal(&self) -> bool {
        self.auto_reveal
    }
}
