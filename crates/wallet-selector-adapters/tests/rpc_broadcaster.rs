use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use base64::Engine;
use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

use wallet_selector_adapters::{AdapterConfig, RpcBroadcaster};
use wallet_selector_core::{Broadcaster, NetworkConfig, PortError, SignedTransaction};

#[tokio::test]
async fn broadcast_posts_base64_payload_and_returns_outcome() {
    let calls = Arc::new(Mutex::new(Vec::<Value>::new()));
    let (url, _join) = spawn_mock_node(
        Arc::clone(&calls),
        vec![(
            200,
            json!({
                "jsonrpc": "2.0",
                "id": "dontcare",
                "result": { "status": { "SuccessValue": "" }, "transaction": { "hash": "abc" } }
            }),
        )],
    );

    let broadcaster = RpcBroadcaster::new(url, Duration::from_secs(5)).expect("client");
    let outcome = broadcaster
        .send_transaction(&SignedTransaction(vec![1, 2, 3]))
        .await
        .expect("broadcast");
    assert_eq!(outcome["transaction"]["hash"], "abc");

    let calls = calls.lock().expect("calls lock");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["method"], "broadcast_tx_commit");
    assert_eq!(
        calls[0]["params"][0],
        base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3])
    );
}

#[tokio::test]
async fn rpc_error_and_failed_status_are_rejections() {
    let calls = Arc::new(Mutex::new(Vec::<Value>::new()));
    let (url, _join) = spawn_mock_node(
        Arc::clone(&calls),
        vec![
            (
                200,
                json!({ "jsonrpc": "2.0", "id": "dontcare", "error": { "name": "HANDLER_ERROR" } }),
            ),
            (
                200,
                json!({
                    "jsonrpc": "2.0",
                    "id": "dontcare",
                    "result": { "status": { "Failure": { "ActionError": {} } } }
                }),
            ),
            (500, json!({ "message": "overloaded" })),
            (502, Value::String("<html>Bad Gateway</html>".to_owned())),
        ],
    );
    let broadcaster = RpcBroadcaster::new(url, Duration::from_secs(5)).expect("client");
    let tx = SignedTransaction(vec![9]);

    let err = broadcaster.send_transaction(&tx).await.expect_err("rpc error");
    assert!(matches!(err, PortError::Rejected(ref m) if m.contains("HANDLER_ERROR")));

    let err = broadcaster.send_transaction(&tx).await.expect_err("failure status");
    assert!(matches!(err, PortError::Rejected(ref m) if m.contains("transaction failed")));

    let err = broadcaster.send_transaction(&tx).await.expect_err("http 500");
    assert!(matches!(err, PortError::Transport(ref m) if m.contains("500")));

    let err = broadcaster.send_transaction(&tx).await.expect_err("http 502");
    assert!(
        matches!(err, PortError::Transport(ref m) if m.contains("502") && m.contains("Bad Gateway"))
    );
}

#[test]
fn broadcaster_uses_configured_node() {
    let config = AdapterConfig {
        network: NetworkConfig::mainnet(),
        ..AdapterConfig::default()
    };
    let broadcaster = RpcBroadcaster::with_config(&config).expect("client");
    assert_eq!(broadcaster.node_url(), "https://rpc.mainnet.near.org");
}

fn spawn_mock_node(
    calls: Arc<Mutex<Vec<Value>>>,
    responses: Vec<(u16, Value)>,
) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for (code, payload) in responses {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            if let Ok(mut g) = calls.lock() {
                g.push(serde_json::from_str(&body).unwrap_or(Value::Null));
            }
            let body = match payload {
                Value::String(raw) => raw,
                other => other.to_string(),
            };
            let response = Response::from_string(body).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    (addr, join)
}
