mod common;

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use common::*;
use model_viewer::store::{HttpModelStore, ModelStore};
use model_viewer::ViewerError;
use reqwest::Url;
use serde_json::{json, Value};

/// What the one-shot server saw
struct Recorded {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serve exactly one request with a canned response
fn serve_once(status: &'static str, body: String) -> (Url, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = Url::parse(&format!("http://{}/models", listener.local_addr().unwrap())).unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut request_body = vec![0; length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();
        reader.get_mut().flush().unwrap();

        Recorded {
            method,
            path,
            headers,
            body: request_body,
        }
    });

    (base, handle)
}

fn store(base: Url) -> HttpModelStore {
    HttpModelStore::new(base, Duration::from_secs(5)).unwrap()
}

#[cfg(test)]
mod http_store_tests {
    use super::*;

    #[test]
    fn test_fetch_one_gets_the_entry_url() {
        let doc = triangle_document("b-node");
        let (base, server) = serve_once("200 OK", json!({ "id": "b", "scene": doc }).to_string());

        let fetched = store(base).fetch_one(&id("b")).unwrap();
        let request = server.join().unwrap();

        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/models/b");
        assert_eq!(fetched, doc);
    }

    #[test]
    fn test_fetch_one_escapes_the_id() {
        let (base, server) = serve_once("200 OK", json!({ "id": "old car/1", "scene": {} }).to_string());

        store(base).fetch_one(&id("old car/1")).unwrap();

        assert_eq!(server.join().unwrap().path, "/models/old%20car%2F1");
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let (base, server) = serve_once("404 Not Found", "{}".to_string());

        let err = store(base).fetch_one(&id("ghost")).unwrap_err();
        server.join().unwrap();

        assert_eq!(err, ViewerError::NotFound(id("ghost")));
    }

    #[test]
    fn test_server_error_is_store_unavailable() {
        let (base, server) = serve_once("500 Internal Server Error", "{}".to_string());

        let err = store(base).list_all().unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ViewerError::StoreUnavailable(_)));
    }

    #[test]
    fn test_malformed_entry_is_store_unavailable() {
        let (base, server) = serve_once("200 OK", "[1, 2".to_string());

        let err = store(base).fetch_one(&id("a")).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ViewerError::StoreUnavailable(_)));
    }

    #[test]
    fn test_closed_port_is_store_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = Url::parse(&format!("http://{}/models", listener.local_addr().unwrap())).unwrap();
        drop(listener);

        let err = store(base).list_all().unwrap_err();
        assert!(matches!(err, ViewerError::StoreUnavailable(_)));
    }

    #[test]
    fn test_list_all_keeps_server_order_and_skips_bad_rows() {
        let body = json!([
            { "id": "b", "scene": {} },
            { "id": "", "scene": {} },
            { "id": 7, "scene": {} },
            { "scene": {} },
            { "id": "a", "scene": {} }
        ]);
        let (base, server) = serve_once("200 OK", body.to_string());

        let ids = store(base).list_all().unwrap();
        let request = server.join().unwrap();

        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/models");
        assert_eq!(ids, vec![id("b"), id("a")]);
    }

    #[test]
    fn test_submit_posts_json_entry() {
        let doc = triangle_document("pac-node");
        let (base, server) = serve_once("201 Created", String::new());

        store(base).submit(&id("pac"), &doc).unwrap();
        let request = server.join().unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/models");
        assert_eq!(request.header("content-type"), Some("application/json"));

        let sent: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(sent, json!({ "id": "pac", "scene": doc }));
    }

    #[test]
    fn test_rejected_submit_is_store_unavailable() {
        let (base, server) = serve_once("503 Service Unavailable", String::new());

        let err = store(base).submit(&id("pac"), &json!({})).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ViewerError::StoreUnavailable(_)));
    }
}
