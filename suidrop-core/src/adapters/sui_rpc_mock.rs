//! Mock Sui JSON-RPC server for testing
//!
//! A small HTTP server that answers the JSON-RPC methods the client uses:
//! - `suix_getBalance` returns `{ coinType, coinObjectCount, totalBalance }`
//! - `suix_getCoins` pages through the configured coins using index cursors
//! - `unsafe_paySui` returns `{ txBytes }` encoding the recipient
//! - `sui_dryRunTransactionBlock` / `sui_executeTransactionBlock` return effects

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value as JsonValue};

/// Mock Sui node for testing
pub struct MockSuiRpcServer {
    port: u16,
    running: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<String>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Canned node behaviour
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub balance: u64,
    /// (object id, balance) per coin
    pub coins: Vec<(String, u64)>,
    pub coin_page_size: usize,
    /// Make every dry run report this failure
    pub dry_run_error: Option<String>,
    /// Make every execution report this failure
    pub execute_error: Option<String>,
    /// Answer this method with a JSON-RPC error object
    pub rpc_error_method: Option<String>,
    /// Answer every request with this HTTP status
    pub http_status: Option<u16>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            balance: 5_000_000_000,
            coins: vec![
                ("0xc1".to_string(), 3_000_000_000),
                ("0xc2".to_string(), 2_000_000_000),
            ],
            coin_page_size: 50,
            dry_run_error: None,
            execute_error: None,
            rpc_error_method: None,
            http_status: None,
        }
    }
}

impl MockSuiRpcServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let calls = Arc::new(Mutex::new(Vec::new()));

        // Non-blocking accept so stop() can end the loop
        listener.set_nonblocking(true)?;

        let running_clone = Arc::clone(&running);
        let calls_clone = Arc::clone(&calls);
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let calls = Arc::clone(&calls_clone);
                        thread::spawn(move || handle_connection(stream, &cfg, &calls));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            calls,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// JSON-RPC method names received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|m| *m == method).count()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockSuiRpcServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, calls: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);

    let Some(body) = read_request_body(&mut stream) else {
        return;
    };

    let request: JsonValue = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => {
            send_response(&mut stream, 400, "Bad Request", r#"{"error": "invalid json"}"#);
            return;
        }
    };

    let method = request["method"].as_str().unwrap_or_default().to_string();
    let id = request["id"].clone();
    if let Ok(mut log) = calls.lock() {
        log.push(method.clone());
    }

    if let Some(status) = config.http_status {
        send_response(&mut stream, status, "Error", r#"{"error": "mock status"}"#);
        return;
    }

    let reply = if config.rpc_error_method.as_deref() == Some(method.as_str()) {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32602, "message": "Invalid params" }
        })
    } else {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": dispatch(&method, &request["params"], config),
        })
    };

    send_response(&mut stream, 200, "OK", &reply.to_string());
}

fn dispatch(method: &str, params: &JsonValue, config: &MockConfig) -> JsonValue {
    match method {
        "suix_getBalance" => json!({
            "coinType": "0x2::sui::SUI",
            "coinObjectCount": config.coins.len(),
            "totalBalance": config.balance.to_string(),
            "lockedBalance": {}
        }),
        "suix_getCoins" => {
            let start = params[2]
                .as_str()
                .and_then(|c| c.parse::<usize>().ok())
                .unwrap_or(0);
            let end = (start + config.coin_page_size).min(config.coins.len());
            let data: Vec<JsonValue> = config.coins[start..end]
                .iter()
                .map(|(id, balance)| {
                    json!({
                        "coinType": "0x2::sui::SUI",
                        "coinObjectId": id,
                        "version": "7",
                        "digest": "mockdigest",
                        "balance": balance.to_string(),
                        "previousTransaction": "prev"
                    })
                })
                .collect();
            let has_next = end < config.coins.len();
            let next_cursor = if has_next {
                JsonValue::from(end.to_string())
            } else {
                JsonValue::Null
            };
            json!({
                "data": data,
                "nextCursor": next_cursor,
                "hasNextPage": has_next
            })
        }
        "unsafe_paySui" => {
            let recipient = params[2][0].as_str().unwrap_or_default();
            json!({
                "txBytes": STANDARD.encode(format!("tx:{}", recipient)),
                "gas": [],
                "inputObjects": []
            })
        }
        "sui_dryRunTransactionBlock" => json!({ "effects": effects(&config.dry_run_error) }),
        "sui_executeTransactionBlock" => json!({
            "digest": "MockDigest1111",
            "effects": effects(&config.execute_error),
            "confirmedLocalExecution": true
        }),
        _ => JsonValue::Null,
    }
}

fn effects(error: &Option<String>) -> JsonValue {
    match error {
        None => json!({ "status": { "status": "success" } }),
        Some(e) => json!({ "status": { "status": "failure", "error": e } }),
    }
}

/// Read headers, then exactly Content-Length bytes of body
fn read_request_body(stream: &mut TcpStream) -> Option<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    Some(String::from_utf8_lossy(&buffer[body_start..]).to_string())
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::ScriptedInput;
    use crate::adapters::sui_rpc::SuiRpcClient;
    use crate::domain::result::Error;
    use crate::domain::{RunEvent, SuiAddress, TransferOutcome, SUI_COIN_TYPE};
    use crate::ports::{ExecutionStatus, PayRequest, SuiNode};
    use crate::services::{TransferService, TransferSettings};

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn owner() -> SuiAddress {
        SuiAddress::from_bytes([9; 32])
    }

    #[test]
    fn test_get_balance() {
        let server = MockSuiRpcServer::start(MockConfig {
            balance: 1_234_567_890,
            ..Default::default()
        })
        .unwrap();

        let client = SuiRpcClient::new(&server.url()).unwrap();
        assert_eq!(client.get_balance(&owner(), SUI_COIN_TYPE).unwrap(), 1_234_567_890);
        assert_eq!(server.calls(), vec!["suix_getBalance"]);
    }

    #[test]
    fn test_get_coins_follows_cursor() {
        let coins: Vec<(String, u64)> = (0..7).map(|i| (format!("0xc{}", i), 100 + i)).collect();
        let server = MockSuiRpcServer::start(MockConfig {
            coins,
            coin_page_size: 3,
            ..Default::default()
        })
        .unwrap();

        let client = SuiRpcClient::new(&server.url()).unwrap();
        let fetched = client.get_coins(&owner(), SUI_COIN_TYPE).unwrap();

        assert_eq!(fetched.len(), 7);
        assert_eq!(fetched[6].object_id, "0xc6");
        assert_eq!(fetched[6].balance, 106);
        assert_eq!(server.call_count("suix_getCoins"), 3);
    }

    #[test]
    fn test_pay_sui_decodes_tx_bytes() {
        let server = MockSuiRpcServer::start(MockConfig::default()).unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();
        let recipient = SuiAddress::from_bytes([2; 32]);

        let bytes = client
            .build_pay_sui(&PayRequest {
                signer: owner(),
                input_coins: vec!["0xc1".to_string()],
                recipient: recipient.clone(),
                amount: 1_000,
                gas_budget: 10_000_000,
            })
            .unwrap();

        assert_eq!(bytes, format!("tx:{}", recipient).into_bytes());
    }

    #[test]
    fn test_dry_run_failure_status() {
        let server = MockSuiRpcServer::start(MockConfig {
            dry_run_error: Some("InsufficientGas".to_string()),
            ..Default::default()
        })
        .unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();

        let status = client.dry_run(b"tx").unwrap();
        assert_eq!(status, ExecutionStatus::Failure("InsufficientGas".to_string()));
    }

    #[test]
    fn test_execute_success() {
        let server = MockSuiRpcServer::start(MockConfig::default()).unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();

        let outcome = client.execute(b"tx", "c2ln").unwrap();
        assert_eq!(outcome.digest, "MockDigest1111");
        assert_eq!(outcome.status, ExecutionStatus::Success);
    }

    #[test]
    fn test_json_rpc_error_maps_to_rpc_error() {
        let server = MockSuiRpcServer::start(MockConfig {
            rpc_error_method: Some("suix_getBalance".to_string()),
            ..Default::default()
        })
        .unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();

        let err = client.get_balance(&owner(), SUI_COIN_TYPE).unwrap_err();
        assert!(matches!(err, Error::Rpc(_)));
        assert!(err.to_string().contains("Invalid params"), "got: {}", err);
    }

    #[test]
    fn test_http_status_errors() {
        let server = MockSuiRpcServer::start(MockConfig {
            http_status: Some(503),
            ..Default::default()
        })
        .unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();
        let err = client.get_balance(&owner(), SUI_COIN_TYPE).unwrap_err();
        assert!(err.to_string().contains("HTTP 503"), "got: {}", err);

        let server = MockSuiRpcServer::start(MockConfig {
            http_status: Some(429),
            ..Default::default()
        })
        .unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();
        let err = client.get_balance(&owner(), SUI_COIN_TYPE).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("rate limit"), "got: {}", err);
    }

    #[test]
    fn test_transfer_run_over_http() {
        let server = MockSuiRpcServer::start(MockConfig::default()).unwrap();
        let client = SuiRpcClient::new(&server.url()).unwrap();
        let service = TransferService::new(std::sync::Arc::new(client), TransferSettings::default());

        let input = ScriptedInput::new(
            MNEMONIC,
            "1",
            [
                format!("0x{}", "ab".repeat(32)),
                "not-an-address".to_string(),
            ],
        );

        let mut outcomes = Vec::new();
        let summary = service
            .run(&input, |event| {
                if let RunEvent::Recipient(report) = event {
                    outcomes.push(report.outcome.clone());
                }
            })
            .unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(
            outcomes[0],
            TransferOutcome::Sent {
                digest: "MockDigest1111".to_string()
            }
        );
        assert_eq!(server.call_count("sui_executeTransactionBlock"), 1);
        assert_eq!(server.call_count("unsafe_paySui"), 1);
    }
}
