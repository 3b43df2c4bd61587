//! Backend wire tests against a local TCP stub.
//!
//! The stub answers each connection with the next canned response (the last
//! one repeats) and records the raw request text.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use notez_llm::{parse_reply, LlmClient, LlmError, LlmProvider, LlmRequest, PromptTemplate, RemoteReply};

struct Stub {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> String {
        self.requests
            .lock()
            .expect("lock")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

async fn spawn_stub(responses: Vec<(u16, String)>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let responses = Arc::new(responses);

    let (hits_task, requests_task) = (Arc::clone(&hits), Arc::clone(&requests));
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let raw = read_request(&mut socket).await;
            requests_task.lock().expect("lock").push(raw);
            let n = hits_task.fetch_add(1, Ordering::SeqCst);
            let (status, body) = responses[n.min(responses.len() - 1)].clone();
            let reply = format!(
                "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                if status == 200 { "OK" } else { "Error" },
                body.len()
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Stub { addr, hits, requests }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn organizer_request(text: &str, mode: &str) -> LlmRequest {
    let (system, user) = PromptTemplate::builtin().render(text, mode);
    LlmRequest::new(system, user).with_timeout(2_000)
}

fn gemini_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }],
        "usageMetadata": { "candidatesTokenCount": 42 }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gemini_request_shape_and_reply() {
    let reply = "```json\n{\"mode\":\"organize\",\"content\":\"# Groceries\",\"format\":\"markdown\"}\n```";
    let stub = spawn_stub(vec![(200, gemini_body(reply))]).await;
    let provider = LlmProvider::from_name("gemini", &stub.base_url(), Some("test-key-123")).expect("provider");
    let client = LlmClient::new(provider, "gemini-1.5-flash", 0);

    let response = client
        .generate(&organizer_request("buy milk and eggs", "organize"))
        .await
        .expect("generate");

    assert_eq!(response.tokens_generated, 42);
    assert_eq!(response.model, "gemini-1.5-flash");
    let RemoteReply::Structured(envelope) = parse_reply(&response.text) else {
        panic!("expected envelope");
    };
    assert_eq!(envelope.content, "# Groceries");

    let request = stub.last_request();
    assert!(request.starts_with("POST /v1beta/models/gemini-1.5-flash:generateContent "));
    assert!(request.to_lowercase().contains("x-goog-api-key: test-key-123"));
    assert!(request.contains("User Input:\\nbuy milk and eggs\\n\\nMode: organize"));
    assert!(request.contains("\"maxOutputTokens\":2048"));
}

#[tokio::test]
async fn server_errors_are_retried_then_exhausted() {
    let stub = spawn_stub(vec![(500, "{}".into())]).await;
    let provider = LlmProvider::from_name("gemini", &stub.base_url(), Some("k")).expect("provider");
    let client = LlmClient::new(provider, "m", 2);

    let err = client
        .generate(&organizer_request("note text here", "organize"))
        .await
        .expect_err("all attempts fail");

    match err {
        LlmError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last_error, LlmError::RequestFailed(ref msg) if msg.contains("500")));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(stub.hits(), 3);
}

#[tokio::test]
async fn retry_recovers_after_transient_failure() {
    let stub = spawn_stub(vec![(503, "{}".into()), (200, gemini_body("plain words"))]).await;
    let provider = LlmProvider::from_name("gemini", &stub.base_url(), Some("k")).expect("provider");
    let client = LlmClient::new(provider, "m", 1);

    let response = client
        .generate(&organizer_request("note text here", "visualize"))
        .await
        .expect("second attempt succeeds");
    assert_eq!(response.text, "plain words");
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn missing_candidates_yield_empty_text() {
    let stub = spawn_stub(vec![(200, "{\"candidates\": []}".into())]).await;
    let provider = LlmProvider::from_name("gemini", &stub.base_url(), Some("k")).expect("provider");
    let client = LlmClient::new(provider, "m", 0);

    let response = client
        .generate(&organizer_request("note text here", "organize"))
        .await
        .expect("generate");
    assert_eq!(parse_reply(&response.text), RemoteReply::Empty);
}

#[tokio::test]
async fn non_json_body_is_parse_error() {
    let stub = spawn_stub(vec![(200, "not json".into())]).await;
    let provider = LlmProvider::from_name("gemini", &stub.base_url(), Some("k")).expect("provider");
    let client = LlmClient::new(provider, "m", 0);

    let err = client
        .generate(&organizer_request("note text here", "organize"))
        .await
        .expect_err("bad body");
    assert!(matches!(err, LlmError::ParseError(_)));
}

// ---------------------------------------------------------------------------
// OpenAI-compatible & Ollama
// ---------------------------------------------------------------------------

#[tokio::test]
async fn openai_uses_chat_completions_with_bearer() {
    let body = serde_json::json!({
        "choices": [{ "message": { "content": "## Notes" } }],
        "usage": { "completion_tokens": 7 }
    })
    .to_string();
    let stub = spawn_stub(vec![(200, body)]).await;
    let provider = LlmProvider::from_name("openai", &stub.base_url(), Some("sk-abc")).expect("provider");
    let client = LlmClient::new(provider, "gpt-4o-mini", 0);

    let response = client
        .generate(&organizer_request("note text here", "organize"))
        .await
        .expect("generate");
    assert_eq!(response.text, "## Notes");
    assert_eq!(response.tokens_generated, 7);

    let request = stub.last_request();
    assert!(request.starts_with("POST /v1/chat/completions "));
    assert!(request.to_lowercase().contains("authorization: bearer sk-abc"));
    assert!(request.contains("\"role\":\"system\""));
}

#[tokio::test]
async fn ollama_generate_endpoint() {
    let body = serde_json::json!({ "response": "graph TD", "eval_count": 3 }).to_string();
    let stub = spawn_stub(vec![(200, body)]).await;
    let provider = LlmProvider::from_name("ollama", &stub.base_url(), None).expect("provider");
    let client = LlmClient::new(provider, "llama3", 0);

    let response = client
        .generate(&organizer_request("note text here", "visualize"))
        .await
        .expect("generate");
    assert_eq!(response.text, "graph TD");

    let request = stub.last_request();
    assert!(request.starts_with("POST /api/generate "));
    assert!(request.contains("\"stream\":false"));
}

#[tokio::test]
async fn refused_connection_exhausts_retries() {
    // Bind then drop to get a port with nothing listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        listener.local_addr().expect("addr")
    };
    let provider = LlmProvider::from_name("ollama", &format!("http://{addr}"), None).expect("provider");
    let client = LlmClient::new(provider, "llama3", 1);

    let err = client
        .generate(&organizer_request("note text here", "organize"))
        .await
        .expect_err("nothing listening");
    match err {
        LlmError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*last_error, LlmError::Unavailable(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn silent_backend_reports_timeout() {
    // Accept connections but never answer.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let provider = LlmProvider::from_name("ollama", &format!("http://{addr}"), None).expect("provider");
    let client = LlmClient::new(provider, "llama3", 0);

    let request = organizer_request("note text here", "organize").with_timeout(150);
    let err = client.generate(&request).await.expect_err("no reply");
    match err {
        LlmError::RetriesExhausted { attempts, last_error } => {
            assert_eq!(attempts, 1);
            assert!(matches!(*last_error, LlmError::Timeout(150)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
