//! Command dispatch and leader redirect resolution
//!
//! Reads are answered by whichever node is contacted. Writes are sent to the
//! given node and, while it answers "not leader" with a hint, re-sent to the
//! hinted address. The redirect chain is bounded by `max_redirect_depth` and
//! the whole dispatch by a wall-clock deadline, so two nodes pointing at each
//! other cannot stall the client.

use std::time::Duration;

use crate::client::command::Operation;
use crate::client::transport::{invoke, Transport};
use crate::client::wire::{
    ClientCommandArgs, ClientCommandReply, CommandOutcome, GetValueArgs, GetValueReply,
    GET_VALUE, HANDLE_CLIENT_COMMAND,
};
use crate::common::{ClientConfig, Error};

/// Successful end of a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Success {
    /// A write was accepted; `error` carries any non-redirect error tag
    /// the node attached to its reply
    Applied {
        result: String,
        error: Option<String>,
    },
    /// A read found its key
    Value { key: String, value: String },
}

/// Terminal state of a dispatch
#[derive(Debug)]
pub enum Outcome {
    Succeeded(Success),
    NotFound { key: String },
    Failed(Error),
}

/// Everything a caller needs to report one dispatch
#[derive(Debug)]
pub struct Dispatch {
    pub operation: Operation,
    pub outcome: Outcome,
    /// Addresses contacted, in order; the first is the caller's address
    pub hops: Vec<String>,
}

impl Dispatch {
    /// Redirects followed before the dispatch ended
    pub fn redirects(&self) -> &[String] {
        self.hops.get(1..).unwrap_or_default()
    }

    /// Should the invocation terminate with a failure status?
    ///
    /// Only a write whose first hop could not be reached, or whose overall
    /// deadline elapsed, is fatal. Read failures, leader resolution
    /// failures and failures on redirect hops are reported and recovered
    /// from.
    pub fn is_fatal(&self) -> bool {
        match (&self.operation, &self.outcome) {
            (Operation::Lookup { .. }, _) => false,
            (_, Outcome::Failed(Error::DeadlineExceeded { .. })) => true,
            (_, Outcome::Failed(err)) => self.hops.len() <= 1 && err.is_unreachable(),
            _ => false,
        }
    }
}

/// Internal state of the redirect loop
enum Step {
    Dispatching { addr: String, depth: usize },
    Done(Outcome),
}

/// Orchestrates classification, transport calls and redirects
pub struct Dispatcher<T> {
    transport: T,
    max_redirect_depth: usize,
    deadline: Duration,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            max_redirect_depth: config.max_redirect_depth,
            deadline: config.dispatch_deadline(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Classify `raw` and run it against `addr` to a terminal state
    pub async fn dispatch(&self, addr: &str, raw: &str) -> Dispatch {
        let operation = Operation::classify(raw);
        tracing::debug!(addr, %operation, "dispatching");

        let mut hops = Vec::new();
        let run = async {
            match &operation {
                Operation::Lookup { key } => self.lookup(addr, key, &mut hops).await,
                Operation::Mutate { command } => self.mutate(addr, command, &mut hops).await,
            }
        };
        let outcome = match tokio::time::timeout(self.deadline, run).await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::Failed(Error::DeadlineExceeded {
                after: self.deadline,
            }),
        };

        if let Outcome::Failed(err) = &outcome {
            tracing::warn!(addr, %operation, error = %err, "dispatch failed");
        }
        Dispatch {
            operation,
            outcome,
            hops,
        }
    }

    async fn lookup(&self, addr: &str, key: &str, hops: &mut Vec<String>) -> Outcome {
        hops.push(addr.to_string());
        let args = GetValueArgs {
            key: key.to_string(),
        };
        match invoke::<_, _, GetValueReply>(&self.transport, addr, GET_VALUE, &args).await {
            Ok(reply) => match reply.into_value() {
                Some(value) => Outcome::Succeeded(Success::Value {
                    key: key.to_string(),
                    value,
                }),
                None => Outcome::NotFound {
                    key: key.to_string(),
                },
            },
            Err(err) => Outcome::Failed(err),
        }
    }

    async fn mutate(&self, addr: &str, command: &str, hops: &mut Vec<String>) -> Outcome {
        let args = ClientCommandArgs {
            command: command.to_string(),
        };
        let mut step = Step::Dispatching {
            addr: addr.to_string(),
            depth: 0,
        };

        loop {
            let (addr, depth) = match step {
                Step::Dispatching { addr, depth } => (addr, depth),
                Step::Done(outcome) => return outcome,
            };
            hops.push(addr.clone());

            let reply = invoke::<_, _, ClientCommandReply>(
                &self.transport,
                &addr,
                HANDLE_CLIENT_COMMAND,
                &args,
            )
            .await;
            step = match reply {
                Err(err) if depth > 0 && err.is_unreachable() => {
                    Step::Done(Outcome::Failed(Error::NoLeaderAvailable {
                        reason: format!("redirect hop {} to {} failed: {}", depth, addr, err),
                    }))
                }
                Err(err) => Step::Done(Outcome::Failed(err)),
                Ok(reply) => self.next_step(reply.outcome(), addr, depth),
            };
        }
    }

    fn next_step(&self, outcome: CommandOutcome, addr: String, depth: usize) -> Step {
        match outcome {
            CommandOutcome::Accepted { result } => Step::Done(Outcome::Succeeded(Success::Applied {
                result,
                error: None,
            })),
            CommandOutcome::Rejected { result, error } => {
                Step::Done(Outcome::Succeeded(Success::Applied {
                    result,
                    error: Some(error),
                }))
            }
            CommandOutcome::NotLeader { redirect: None } => {
                Step::Done(Outcome::Failed(Error::NoLeaderAvailable {
                    reason: format!("{} is not the leader and gave no redirect", addr),
                }))
            }
            CommandOutcome::NotLeader { redirect: Some(_) } if depth >= self.max_redirect_depth => {
                Step::Done(Outcome::Failed(Error::RedirectLoopBound {
                    depth: self.max_redirect_depth,
                    last: addr,
                }))
            }
            CommandOutcome::NotLeader {
                redirect: Some(leader),
            } => {
                tracing::info!(
                    from = %addr,
                    to = %leader,
                    depth = depth + 1,
                    "following leader redirect"
                );
                Step::Dispatching {
                    addr: leader,
                    depth: depth + 1,
                }
            }
        }
    }
}
