//! Recognized command-echo message shapes.
//!
//! Only the literal templates below are inspected. Every other
//! message is [`MessageTemplate::Unknown`] and is never suppressed.

use std::borrow::Cow;

/// A log message shape emitted by the command dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageTemplate {
    /// `{} issued server command: {}`; the argument is the full command line.
    IssuedServerCommand,
    /// `{0} executed command: /{1}`; the argument lacks its leading slash.
    ExecutedCommand,
    /// `{} -> executed command /{}`; the argument lacks its leading slash.
    ExecutedCommandArrow,
    /// Any message that is not a command echo.
    Unknown,
}

// Keyed by the exact template text.
const TEMPLATES: &[(&str, MessageTemplate)] = &[
    (
        "{} issued server command: {}",
        MessageTemplate::IssuedServerCommand,
    ),
    ("{0} executed command: /{1}", MessageTemplate::ExecutedCommand),
    (
        "{} -> executed command /{}",
        MessageTemplate::ExecutedCommandArrow,
    ),
];

impl MessageTemplate {
    /// Looks up the shape of `template`. Matching is exact.
    pub fn parse(template: &str) -> Self {
        TEMPLATES
            .iter()
            .find(|(literal, _)| *literal == template)
            .map_or(Self::Unknown, |(_, shape)| *shape)
    }

    /// The literal template text, or `None` for [`MessageTemplate::Unknown`].
    pub fn literal(self) -> Option<&'static str> {
        TEMPLATES
            .iter()
            .find(|(_, shape)| *shape == self)
            .map(|(literal, _)| *literal)
    }

    /// Position of the argument holding the executed command.
    pub const fn command_argument(self) -> Option<usize> {
        match self {
            Self::IssuedServerCommand | Self::ExecutedCommand | Self::ExecutedCommandArrow => {
                Some(1)
            }
            Self::Unknown => None,
        }
    }

    /// Rebuilds the command line as the user typed it.
    pub fn command_text(self, argument: &str) -> Option<Cow<'_, str>> {
        match self {
            Self::IssuedServerCommand => Some(Cow::Borrowed(argument)),
            Self::ExecutedCommand | Self::ExecutedCommandArrow => {
                Some(Cow::Owned(format!("/{argument}")))
            }
            Self::Unknown => None,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}
