//! Error types for leaderkv

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("Connection to {addr} failed: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("RPC to {addr} failed: {reason}")]
    Call { addr: String, reason: String },

    #[error("RPC to {addr} timed out after {after:?}")]
    Timeout { addr: String, after: Duration },

    // === Leader Resolution Errors ===
    #[error("No leader available: {reason}")]
    NoLeaderAvailable { reason: String },

    #[error("Redirect limit of {depth} reached (last contacted {last})")]
    RedirectLoopBound { depth: usize, last: String },

    #[error("Dispatch deadline of {after:?} exceeded")]
    DeadlineExceeded { after: Duration },

    // === Input Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid node address: {0}")]
    InvalidAddress(String),

    // === Generic ===
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl Error {
    /// Did the failure happen while talking to a single node?
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. } | Error::Call { .. } | Error::Timeout { .. }
        )
    }

    /// A transport failure, or a node address that could not be dialed.
    ///
    /// These are the errors a stale redirect typically produces, so the
    /// dispatcher folds them into [`Error::NoLeaderAvailable`] past the
    /// first hop and treats them as fatal on the first hop of a write.
    pub fn is_unreachable(&self) -> bool {
        self.is_transport() || matches!(self, Error::InvalidAddress(_))
    }

    /// Short outcome category used in status lines
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Connection { .. } => "connection",
            Error::Call { .. } => "call",
            Error::Timeout { .. } => "timeout",
            Error::NoLeaderAvailable { .. } => "no-leader",
            Error::RedirectLoopBound { .. } => "redirect-loop",
            Error::DeadlineExceeded { .. } => "deadline",
            Error::InvalidConfig(_) => "config",
            Error::InvalidAddress(_) => "address",
            Error::Codec(_) => "codec",
        }
    }
}
