//! Command classification
//!
//! A raw command line is either a read (`GET <key>`), answered by the
//! contacted node directly, or anything else, which is forwarded verbatim to
//! the cluster leader.

use std::fmt;

/// Leading token that selects the read path
pub const LOOKUP_TOKEN: &str = "GET";

/// Remote operation selected for a raw command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Read a single key from the contacted node
    Lookup { key: String },
    /// Submit the command text to the leader, unchanged
    Mutate { command: String },
}

impl Operation {
    /// Classify a raw command line.
    ///
    /// `GET` must stand alone as the first token, so `GETX a` is a write.
    /// An empty key (`GET` alone) is passed through to the node.
    pub fn classify(raw: &str) -> Self {
        match raw.strip_prefix(LOOKUP_TOKEN) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                Operation::Lookup {
                    key: rest.trim().to_string(),
                }
            }
            _ => Operation::Mutate {
                command: raw.to_string(),
            },
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Operation::Lookup { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Lookup { key } => write!(f, "lookup {:?}", key),
            Operation::Mutate { command } => write!(f, "mutate {:?}", command),
        }
    }
}
