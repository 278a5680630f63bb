//! The `leaderkv` binary against in-process fake cluster nodes

mod common;

use std::collections::HashMap;
use std::process::{Command, Output};

use common::{dead_address, FakeNode, Role};

/// Run the binary off the runtime so the fake nodes keep serving
async fn leaderkv(args: &[&str]) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_leaderkv"))
            .args(&args)
            .env_remove("RUST_LOG")
            .env_remove("LEADERKV_CALL_TIMEOUT_MS")
            .env_remove("LEADERKV_MAX_REDIRECT_DEPTH")
            .env_remove("LEADERKV_LOG_LEVEL")
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_command_is_usage_error() {
    let out = leaderkv(&["127.0.0.1:1"]).await;
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Usage"));
    assert!(stdout(&out).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_write_exits_with_failure() {
    let addr = dead_address().await;
    let out = leaderkv(&["--timeout", "1s", &addr, "SET", "x", "5"]).await;
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("ERROR [connection]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_read_exits_cleanly() {
    let addr = dead_address().await;
    let out = leaderkv(&["--timeout", "1s", &addr, "GET", "x"]).await;
    assert_eq!(out.status.code(), Some(0));
    assert!(stderr(&out).contains("ERROR [connection]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirected_write_reports_leader() {
    let leader = FakeNode::spawn(Role::Leader, HashMap::new()).await;
    let follower = FakeNode::spawn(
        Role::Follower {
            leader: leader.addr.clone(),
        },
        HashMap::new(),
    )
    .await;

    let out = leaderkv(&["--timeout", "1s", &follower.addr, "SET", "x", "5"]).await;
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.contains(&format!("Redirected to leader at {}", leader.addr)));
    assert!(text.contains("OK: OK"));
    assert_eq!(*leader.commands.lock().await, vec!["SET x 5".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lookup_prints_value_or_not_found() {
    let data = HashMap::from([("x".to_string(), "5".to_string())]);
    let node = FakeNode::spawn(Role::Leader, data).await;

    let out = leaderkv(&["--timeout", "1s", &node.addr, "GET", "x"]).await;
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("x = 5"));

    let out = leaderkv(&["--timeout", "1s", &node.addr, "GET", "y"]).await;
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Key y not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_redirects_against_follower() {
    let leader = FakeNode::spawn(Role::Leader, HashMap::new()).await;
    let follower = FakeNode::spawn(
        Role::Follower {
            leader: leader.addr.clone(),
        },
        HashMap::new(),
    )
    .await;

    let out = leaderkv(&[
        "--timeout",
        "1s",
        "--max-redirects",
        "0",
        &follower.addr,
        "SET",
        "x",
        "5",
    ])
    .await;
    assert_eq!(out.status.code(), Some(0));
    assert!(stderr(&out).contains("ERROR [redirect-loop]"));
    assert!(!stdout(&out).contains("Redirected"));
    assert_eq!(leader.calls(), 0);
}
