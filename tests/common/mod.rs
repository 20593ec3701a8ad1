//! Minimal HTTP/1.1 server standing in for EDGAR during tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use fastedgar::config::{Endpoints, RequestHeaders};
use fastedgar::Config;

pub const TEST_USER_AGENT: &str = "fastedgar test suite tests@example.com";

#[derive(Clone)]
struct Route {
    status: u16,
    content_type: &'static str,
    body: String,
}

pub struct StubServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

#[derive(Default)]
pub struct StubBuilder {
    routes: HashMap<String, Route>,
}

impl StubBuilder {
    pub fn json(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route { status, content_type: "application/json", body: body.into() },
        );
        self
    }

    pub fn html(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route { status, content_type: "text/html", body: body.into() },
        );
        self
    }

    pub fn text(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route { status, content_type: "text/plain", body: body.into() },
        );
        self
    }

    pub async fn start(self) -> StubServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let routes = Arc::new(self.routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    serve(stream, &routes, &recorded).await;
                });
            }
        });

        StubServer { base, requests }
    }
}

impl StubServer {
    pub fn builder() -> StubBuilder {
        StubBuilder::default()
    }

    /// Raw request heads received so far, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Request paths received so far, in arrival order
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.split_whitespace().nth(1).map(str::to_string))
            .collect()
    }

    pub fn config(&self) -> Config {
        Config {
            endpoints: Endpoints {
                submissions_base: format!("{}/submissions", self.base),
                archives_base: format!("{}/Archives/edgar/data", self.base),
                tickers_url: format!("{}/files/company_tickers.json", self.base),
            },
            headers: RequestHeaders::with_user_agent(TEST_USER_AGENT),
            ..Config::default()
        }
    }
}

async fn serve(mut stream: TcpStream, routes: &HashMap<String, Route>, recorded: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    recorded.lock().unwrap().push(head);

    let route = routes.get(&path).cloned().unwrap_or(Route {
        status: 404,
        content_type: "text/html",
        body: "<html><body>Not Found</body></html>".to_string(),
    });

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        reason_phrase(route.status),
        route.content_type,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Submissions body with the given parallel columns
pub fn submissions_json(forms: &[&str], accessions: &[&str], dates: &[&str], documents: &[&str]) -> String {
    serde_json::json!({
        "cik": "0000320193",
        "name": "Apple Inc.",
        "filings": {
            "recent": {
                "form": forms,
                "accessionNumber": accessions,
                "filingDate": dates,
                "primaryDocument": documents,
            },
            "files": []
        }
    })
    .to_string()
}
