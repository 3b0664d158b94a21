/// One positional argument of a log event.
///
/// Only string-typed arguments can be inspected. Adapters map every other
/// value to [`LogArgument::Opaque`] without formatting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogArgument<'a> {
    Text(&'a str),
    Opaque,
}

impl<'a> LogArgument<'a> {
    pub const fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(text) => Some(*text),
            Self::Opaque => None,
        }
    }
}

impl<'a> From<&'a str> for LogArgument<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for LogArgument<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for LogArgument<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(Self::Opaque, Self::Text)
    }
}

/// Owned argument captured by an adapter while walking a backend event.
#[cfg(any(feature = "slog", feature = "tracing"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CapturedArgument {
    Text(String),
    Opaque,
}

#[cfg(any(feature = "slog", feature = "tracing"))]
impl CapturedArgument {
    pub(crate) fn as_argument(&self) -> LogArgument<'_> {
        match self {
            Self::Text(text) => LogArgument::Text(text),
            Self::Opaque => LogArgument::Opaque,
        }
    }
}
