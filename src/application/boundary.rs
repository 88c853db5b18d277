//! Types exchanged with the rendering host.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::application::animation::AnimationTicket;
use crate::domain::{Edge, Key, PositionedNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Insert,
    Delete,
    Search,
    Traversals,
    Clear,
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insert" | "i" | "add" => Ok(Self::Insert),
            "delete" | "d" | "del" | "remove" => Ok(Self::Delete),
            "search" | "s" | "find" => Ok(Self::Search),
            "traverse" | "traversals" | "t" => Ok(Self::Traversals),
            "clear" | "c" => Ok(Self::Clear),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

impl OperationKind {
    /// Whether the operation reads a key from its raw input.
    pub fn takes_key(self) -> bool {
        matches!(self, Self::Insert | Self::Delete | Self::Search)
    }
}

/// An operation request as produced by an input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    /// Unparsed key text; ignored by traversals and clear
    pub raw_input: String,
}

impl OperationRequest {
    pub fn new(kind: OperationKind, raw_input: impl Into<String>) -> Self {
        Self {
            kind,
            raw_input: raw_input.into(),
        }
    }

    pub fn insert(raw_input: impl Into<String>) -> Self {
        Self::new(OperationKind::Insert, raw_input)
    }

    pub fn delete(raw_input: impl Into<String>) -> Self {
        Self::new(OperationKind::Delete, raw_input)
    }

    pub fn search(raw_input: impl Into<String>) -> Self {
        Self::new(OperationKind::Search, raw_input)
    }

    pub fn traversals() -> Self {
        Self::new(OperationKind::Traversals, "")
    }

    pub fn clear() -> Self {
        Self::new(OperationKind::Clear, "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Success,
    Info,
    Warning,
    Error,
}

/// Short one-line summary of the last request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub tone: Tone,
    pub message: String,
}

impl StatusLine {
    pub fn new(tone: Tone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything a renderer needs after a request or an animation tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub narration: String,
    pub status: StatusLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Key>,
    pub tree_height: i32,
    pub animating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<AnimationTicket>,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_aliases_when_parsing_kind_then_resolved() {
        assert_eq!("I".parse::<OperationKind>(), Ok(OperationKind::Insert));
        assert_eq!("del".parse::<OperationKind>(), Ok(OperationKind::Delete));
        assert_eq!("find".parse::<OperationKind>(), Ok(OperationKind::Search));
        assert_eq!("t".parse::<OperationKind>(), Ok(OperationKind::Traversals));
        assert!("rotate".parse::<OperationKind>().is_err());
    }
}
