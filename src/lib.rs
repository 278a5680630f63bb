//! # leaderkv
//!
//! Command-line client for a replicated key-value store whose nodes run a
//! leader-based consensus protocol:
//! - Reads (`GET <key>`) are answered by the contacted node
//! - Writes go to the leader; followers reply "not leader" with a hint and
//!   the client follows it, up to a configurable number of redirects
//! - Every call carries a timeout and every dispatch a wall-clock deadline
//!
//! ## Architecture
//!
//! ```text
//!  leaderkv <addr> <command>
//!        │
//!  ┌─────▼──────┐   Lookup / Mutate   ┌────────────┐
//!  │ Classifier ├────────────────────►│ Dispatcher │◄──┐ redirect
//!  └────────────┘                     └─────┬──────┘   │ (bounded)
//!                                           │ JSON-RPC │
//!                                     ┌─────▼──────┐   │
//!                                     │ Transport  ├───┘
//!                                     └─────┬──────┘
//!                                           │ TCP
//!                                   ┌───────▼────────┐
//!                                   │  cluster node  │
//!                                   └────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Write, following redirects to the leader
//! leaderkv localhost:8080 SET x 5
//!
//! # Read from one node
//! leaderkv localhost:8081 "GET x"
//!
//! # Tighter bounds
//! leaderkv --timeout 500ms --max-redirects 2 localhost:8080 SET x 6
//! ```

pub mod client;
pub mod common;

// Re-export commonly used types
pub use client::{Dispatch, Dispatcher, Operation, Outcome, Success, TcpTransport, Transport};
pub use common::{ClientConfig, Error, Result};
