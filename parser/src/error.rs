use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::position::SourcePosition;

/// One entry of a [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// Raised by the primitive consumers on a mismatch. An empty text stands
    /// for the end of the input.
    SystemUnexpected(String),
    Unexpected(String),
    /// Installed by labels.
    Expected(String),
    Message(String),
}

impl ErrorMessage {
    pub fn text(&self) -> &str {
        match self {
            ErrorMessage::SystemUnexpected(text)
            | ErrorMessage::Unexpected(text)
            | ErrorMessage::Expected(text)
            | ErrorMessage::Message(text) => text,
        }
    }
}

/// A position together with the messages reported there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}:{}", render_messages(.messages))]
pub struct ParseError {
    pub position: SourcePosition,
    pub messages: Vec<ErrorMessage>,
}

impl ParseError {
    /// An error without messages. Successful steps carry one of these as
    /// their hint.
    pub fn unknown(position: SourcePosition) -> Self {
        Self {
            position,
            messages: Vec::new(),
        }
    }

    pub fn new(message: ErrorMessage, position: SourcePosition) -> Self {
        let mut messages = Vec::new();
        messages.push(message);
        Self { position, messages }
    }

    pub fn is_unknown(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn add_message(self, message: ErrorMessage) -> Self {
        let mut messages = self.messages;
        messages.push(message);
        Self {
            position: self.position,
            messages,
        }
    }

    /// Replaces every message with one `Expected` entry per label.
    pub fn set_expected<S: AsRef<str>>(self, labels: &[S]) -> Self {
        Self {
            position: self.position,
            messages: labels
                .iter()
                .map(|label| ErrorMessage::Expected(String::from(label.as_ref())))
                .collect(),
        }
    }

    /// Combines two errors.
    ///
    /// An error with messages always wins over one without. Otherwise the
    /// error further into the input wins, and errors at the same position
    /// keep the messages of both, `self` first.
    pub fn merge(self, other: ParseError) -> ParseError {
        if other.is_unknown() && !self.is_unknown() {
            return self;
        }
        if self.is_unknown() && !other.is_unknown() {
            return other;
        }
        match self.position.cmp(&other.position) {
            Ordering::Equal => {
                let mut messages = self.messages;
                messages.extend(other.messages);
                Self {
                    position: self.position,
                    messages,
                }
            }
            Ordering::Greater => self,
            Ordering::Less => other,
        }
    }
}

fn join_or(items: &[&str]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(if i + 1 == items.len() { " or " } else { ", " });
        }
        out.push_str(item);
    }
    out
}

fn texts<'a>(messages: &'a [ErrorMessage], keep: fn(&ErrorMessage) -> bool) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for text in messages
        .iter()
        .filter(|m| keep(m))
        .map(ErrorMessage::text)
        .filter(|t| !t.is_empty())
    {
        if !out.contains(&text) {
            out.push(text);
        }
    }
    out
}

fn render_messages(messages: &[ErrorMessage]) -> String {
    if messages.is_empty() {
        return String::from("\nunknown parse error");
    }

    let mut out = String::new();
    let unexpected = texts(messages, |m| matches!(m, ErrorMessage::Unexpected(_)));
    let expected = texts(messages, |m| matches!(m, ErrorMessage::Expected(_)));
    let free = texts(messages, |m| matches!(m, ErrorMessage::Message(_)));

    if unexpected.is_empty() {
        let system = messages.iter().find_map(|m| match m {
            ErrorMessage::SystemUnexpected(text) => Some(text.as_str()),
            _ => None,
        });
        match system {
            Some("") => out.push_str("\nunexpected end of input"),
            Some(text) => {
                out.push_str("\nunexpected ");
                out.push_str(text);
            }
            None => {}
        }
    } else {
        out.push_str("\nunexpected ");
        out.push_str(&join_or(&unexpected));
    }
    if !expected.is_empty() {
        out.push_str("\nexpecting ");
        out.push_str(&join_or(&expected));
    }
    for text in free {
        out.push('\n');
        out.push_str(text);
    }
    out
}
