//! Shared helpers for integration tests
//!
//! `RateStub` is a throwaway HTTP/1.1 server on 127.0.0.1 that answers every
//! request through a handler and records the request targets it saw.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub type Handler = Box<dyn Fn(&str) -> (&'static str, String) + Send>;

pub struct RateStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl RateStub {
    /// Start serving; `handler` maps a request target to (status line, body)
    pub fn start(handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                serve_one(stream, &handler, &seen);
            }
        });

        Self { base_url, requests }
    }

    /// Stub that answers every day with the same `symbol` quote
    pub fn fixed(symbol: &'static str, raw: f64) -> Self {
        Self::start(Box::new(move |_: &str| {
            (
                "200 OK",
                format!(
                    r#"{{"success":true,"historical":true,"base":"EUR","rates":{{"{}":{}}}}}"#,
                    symbol, raw
                ),
            )
        }))
    }

    /// Request targets received so far, e.g. `/v1/2023-02-01?access_key=..`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve_one(mut stream: TcpStream, handler: &Handler, seen: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&buf);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();

    let (status, body) = handler(&target);
    seen.lock().unwrap().push(target);

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Minimal export in the layout the tool expects
pub fn sample_export(rows: &[(&str, &str)]) -> String {
    let mut out = String::from("Date,Account,Description,Amount,Balance,Category\n");
    for (ts, amount) in rows {
        out.push_str(&format!("{},UA01,Transfer,{},0.00,misc\n", ts, amount));
    }
    out
}
