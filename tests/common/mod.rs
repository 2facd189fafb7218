//! Minimal HTTP/1.1 server standing in for the GitHub REST API.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A request received by [`MockGitHub`]
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Path including the query string
    pub path: String,
    pub body: String,
}

impl Request {
    pub fn is(&self, method: &str, path: &str) -> bool {
        self.method == method && self.path.split('?').next() == Some(path)
    }

    pub fn query(&self) -> &str {
        self.path.split_once('?').map(|(_, q)| q).unwrap_or("")
    }
}

/// Serves one request per connection until the test process exits
pub struct MockGitHub {
    pub url: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockGitHub {
    /// `respond` maps each request to a status code and JSON body
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&Request) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let Some(request) = read_request(&stream) else {
                    continue;
                };
                let (status, body) = respond(&request);
                log.lock().unwrap().push(request);
                write_response(stream, status, &body);
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(Request {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        404 => "Not Found",
        _ => "Error",
    };
    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.flush();
}

pub fn repository_json() -> String {
    serde_json::json!({
        "name": "repo",
        "full_name": "owner/repo",
        "description": null,
        "html_url": "https://github.com/owner/repo",
        "default_branch": "main",
    })
    .to_string()
}

pub fn issue_json(number: u64, body: &str, state: &str) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": format!("TODO: item {}", number),
        "body": body,
        "state": state,
        "html_url": format!("https://github.com/owner/repo/issues/{}", number),
    })
}
