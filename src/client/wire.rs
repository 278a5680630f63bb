//! RPC contract with cluster nodes
//!
//! Field names match the node's exported structs exactly. Frames are
//! newline-delimited JSON-RPC 1.0 objects, one request and one reply per
//! connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Submit a command to the leader
pub const HANDLE_CLIENT_COMMAND: &str = "Node.HandleClientCommand";

/// Read a key from the contacted node
pub const GET_VALUE: &str = "Node.GetValue";

/// Error tag a follower puts in `Err` when it refuses a write
pub const NOT_LEADER: &str = "not leader";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientCommandArgs {
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClientCommandReply {
    pub result: String,
    pub err: String,
    pub redirect_leader: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetValueArgs {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetValueReply {
    pub value: String,
    pub found: bool,
}

/// Tagged reading of a [`ClientCommandReply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The node applied the command
    Accepted { result: String },
    /// The node is a follower; `redirect` is its leader hint, if any
    NotLeader { redirect: Option<String> },
    /// The node answered with some other error; surfaced, not retried
    Rejected { result: String, error: String },
}

impl ClientCommandReply {
    pub fn outcome(self) -> CommandOutcome {
        if self.err == NOT_LEADER {
            let redirect = Some(self.redirect_leader.trim().to_string()).filter(|r| !r.is_empty());
            CommandOutcome::NotLeader { redirect }
        } else if self.err.is_empty() {
            CommandOutcome::Accepted {
                result: self.result,
            }
        } else {
            CommandOutcome::Rejected {
                result: self.result,
                error: self.err,
            }
        }
    }
}

impl GetValueReply {
    /// `Value` is only meaningful when `Found` is set
    pub fn into_value(self) -> Option<String> {
        self.found.then_some(self.value)
    }
}

/// JSON-RPC request frame
#[derive(Debug, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: [Value; 1],
    pub id: u64,
}

impl RpcRequest {
    pub fn new(method: &str, args: Value, id: u64) -> Self {
        Self {
            method: method.to_string(),
            params: [args],
            id,
        }
    }
}

/// JSON-RPC reply frame; `error` is `null` on success
#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: u64,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Value,
}

impl RpcResponse {
    /// Split the frame into the result payload or the server's error text
    pub fn into_result(self) -> std::result::Result<Value, String> {
        match self.error {
            Value::Null => Ok(self.result),
            Value::String(msg) => Err(msg),
            other => Err(other.to_string()),
        }
    }
}
