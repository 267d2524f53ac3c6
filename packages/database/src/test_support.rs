//! Loopback stand-ins for the remote table.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::{TcpListener, TcpStream};

/// Reads headers plus a `content-length` body.
pub async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0_u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

/// Starts an in-memory `(key, value)` table that answers the remote
/// backend's select, upsert and delete requests. Returns its base URL.
pub async fn fake_table() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let rows: Arc<Mutex<BTreeMap<String, Value>>> = Arc::default();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let request = read_request(&mut socket).await;
            let (status_line, body) = answer(&rows, &request);
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });
    format!("http://{addr}")
}

fn answer(rows: &Mutex<BTreeMap<String, Value>>, request: &str) -> (&'static str, String) {
    let (head, body) = request.split_once("\r\n\r\n").unwrap_or((request, ""));
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default();
    let target = request_line.next().unwrap_or_default();
    let key = target
        .split_once('?')
        .map(|(_, query)| query)
        .unwrap_or_default()
        .split('&')
        .find_map(|pair| pair.strip_prefix("key=eq."))
        .map(str::to_string);

    let mut rows = rows.lock().unwrap();
    match (method, key) {
        ("GET", Some(key)) => {
            let found: Vec<Value> = rows
                .get(&key)
                .map(|value| json!({ "value": value }))
                .into_iter()
                .collect();
            ("200 OK", Value::Array(found).to_string())
        }
        ("POST", _) => {
            let row: Value = serde_json::from_str(body).unwrap();
            let key = row["key"].as_str().unwrap().to_string();
            rows.insert(key, row["value"].clone());
            ("201 Created", String::new())
        }
        ("DELETE", Some(key)) => {
            rows.remove(&key);
            ("200 OK", String::new())
        }
        _ => ("400 Bad Request", String::new()),
    }
}
