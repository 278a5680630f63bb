//! Transport to cluster nodes
//!
//! Every call opens its own connection, performs exactly one request/reply
//! exchange and drops the connection before returning. There is no retry at
//! this layer.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

use crate::client::wire::{RpcRequest, RpcResponse};
use crate::common::{validate_address, Error, Result};

/// Largest reply frame accepted from a node, newline included
pub const MAX_FRAME: u64 = 1024 * 1024;

/// A single synchronous remote call against a named node
pub trait Transport {
    /// Call `method` on the node at `addr` with one argument object.
    ///
    /// Fails with [`Error::Connection`] when `addr` cannot be reached and with
    /// [`Error::Call`] or [`Error::Timeout`] once connected.
    fn call(
        &self,
        addr: &str,
        method: &str,
        args: Value,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Typed wrapper around [`Transport::call`]
pub async fn invoke<T, A, R>(transport: &T, addr: &str, method: &str, args: &A) -> Result<R>
where
    T: Transport + ?Sized,
    A: Serialize,
    R: DeserializeOwned,
{
    let args = serde_json::to_value(args)?;
    let reply = transport.call(addr, method, args).await?;
    serde_json::from_value(reply).map_err(|e| Error::Call {
        addr: addr.to_string(),
        reason: format!("malformed {} reply: {}", method, e),
    })
}

/// JSON-RPC over TCP, one connection per call
#[derive(Debug)]
pub struct TcpTransport {
    call_timeout: Duration,
    next_id: AtomicU64,
}

impl TcpTransport {
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            call_timeout,
            next_id: AtomicU64::new(0),
        }
    }
}

impl Transport for TcpTransport {
    async fn call(&self, addr: &str, method: &str, args: Value) -> Result<Value> {
        validate_address(addr)?;
        let deadline = Instant::now() + self.call_timeout;
        tracing::debug!(addr, method, "opening connection");

        let mut stream = match timeout_at(deadline, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                tracing::warn!(addr, error = %source, "connection failed");
                return Err(Error::Connection {
                    addr: addr.to_string(),
                    source,
                });
            }
            Err(_) => {
                tracing::warn!(addr, "connection timed out");
                return Err(Error::Connection {
                    addr: addr.to_string(),
                    source: io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("connect timed out after {:?}", self.call_timeout),
                    ),
                });
            }
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(method, args, id);

        let result = match timeout_at(deadline, exchange(&mut stream, &request)).await {
            Ok(Ok(response)) if response.id != id => Err(format!(
                "reply id {} does not match request id {}",
                response.id, id
            )),
            Ok(Ok(response)) => response
                .into_result()
                .map_err(|msg| format!("server error: {}", msg)),
            Ok(Err(reason)) => Err(reason),
            Err(_) => {
                tracing::warn!(addr, method, "call timed out");
                return Err(Error::Timeout {
                    addr: addr.to_string(),
                    after: self.call_timeout,
                });
            }
        };

        result.map_err(|reason| {
            tracing::warn!(addr, method, %reason, "call failed");
            Error::Call {
                addr: addr.to_string(),
                reason,
            }
        })
    }
}

/// Write one request frame and read one reply frame
async fn exchange(
    stream: &mut TcpStream,
    request: &RpcRequest,
) -> std::result::Result<RpcResponse, String> {
    let mut frame = serde_json::to_vec(request).map_err(|e| e.to_string())?;
    frame.push(b'\n');

    stream
        .write_all(&frame)
        .await
        .map_err(|e| format!("write failed: {}", e))?;
    stream
        .flush()
        .await
        .map_err(|e| format!("flush failed: {}", e))?;

    let mut line = Vec::new();
    let n = BufReader::new(stream)
        .take(MAX_FRAME)
        .read_until(b'\n', &mut line)
        .await
        .map_err(|e| format!("read failed: {}", e))?;
    if n == 0 {
        return Err("connection closed before reply".into());
    }
    if line.last() != Some(&b'\n') && n as u64 >= MAX_FRAME {
        return Err(format!("reply exceeds {} bytes", MAX_FRAME));
    }

    serde_json::from_slice(&line).map_err(|e| format!("malformed reply frame: {}", e))
}
