//! In-process fake cluster nodes shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use leaderkv::client::wire::{RpcRequest, GET_VALUE, HANDLE_CLIENT_COMMAND, NOT_LEADER};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// How a fake node answers `Node.HandleClientCommand`
#[derive(Clone)]
pub enum Role {
    Leader,
    Follower { leader: String },
}

/// Minimal JSON-RPC node: a role, a key space and a log of commands seen
pub struct FakeNode {
    pub addr: String,
    calls: Arc<AtomicUsize>,
    pub commands: Arc<Mutex<Vec<String>>>,
}

impl FakeNode {
    pub async fn spawn(role: Role, data: HashMap<String, String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::serve(listener, Arc::new(Mutex::new(role)), data)
    }

    pub fn serve(listener: TcpListener, role: Arc<Mutex<Role>>, data: HashMap<String, String>) -> Self {
        let addr = listener.local_addr().unwrap().to_string();
        let calls = Arc::new(AtomicUsize::new(0));
        let commands = Arc::new(Mutex::new(Vec::new()));

        let node = FakeNode {
            addr,
            calls: calls.clone(),
            commands: commands.clone(),
        };
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                calls.fetch_add(1, Ordering::SeqCst);
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    continue;
                }
                let req: RpcRequest = serde_json::from_str(&line).unwrap();
                let [args] = req.params;

                let result = match req.method.as_str() {
                    HANDLE_CLIENT_COMMAND => {
                        let command = args["Command"].as_str().unwrap_or_default().to_string();
                        commands.lock().await.push(command);
                        match &*role.lock().await {
                            Role::Leader => json!({"Result": "OK", "Err": "", "RedirectLeader": ""}),
                            Role::Follower { leader } => {
                                json!({"Result": "", "Err": NOT_LEADER, "RedirectLeader": leader})
                            }
                        }
                    }
                    GET_VALUE => {
                        let key = args["Key"].as_str().unwrap_or_default();
                        match data.get(key) {
                            Some(v) => json!({"Value": v, "Found": true}),
                            None => json!({"Value": "", "Found": false}),
                        }
                    }
                    _ => Value::Null,
                };
                let reply = json!({"id": req.id, "result": result, "error": null});
                let mut frame = serde_json::to_vec(&reply).unwrap();
                frame.push(b'\n');
                reader.get_mut().write_all(&frame).await.unwrap();
            }
        });
        node
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// An address nothing listens on
pub async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().to_string()
}
