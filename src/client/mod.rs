//! Client side of the cluster protocol
//!
//! - [`command`]: classify a raw command line into a read or a write
//! - [`wire`]: request/reply shapes the nodes expose over RPC
//! - [`transport`]: one connection, one call
//! - [`dispatcher`]: run a command to completion, following leader redirects

pub mod command;
pub mod dispatcher;
pub mod transport;
pub mod wire;

pub use command::Operation;
pub use dispatcher::{Dispatch, Dispatcher, Outcome, Success};
pub use transport::{TcpTransport, Transport};
