/// Outcome of evaluating one log event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[must_use]
pub enum Verdict {
    /// Emit the event.
    #[default]
    Keep,
    /// Suppress the event.
    Deny,
}

impl Verdict {
    pub const fn is_keep(self) -> bool {
        matches!(self, Self::Keep)
    }

    pub const fn is_deny(self) -> bool {
        matches!(self, Self::Deny)
    }

    /// Combines two verdicts; `Deny` from either side wins.
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Keep, Self::Keep) => Self::Keep,
            _ => Self::Deny,
        }
    }
}

impl From<bool> for Verdict {
    /// Maps an "accepted" flag from a backend filter.
    fn from(accepted: bool) -> Self {
        if accepted { Self::Keep } else { Self::Deny }
    }
}
