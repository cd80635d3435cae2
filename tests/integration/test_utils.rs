//! Shared test utilities for integration tests
//!
//! Builds sessions from inline trees and isolates the config environment so
//! loader tests never see the developer's own files.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use when_engine::context::ResolverSettings;
use when_engine::registry::ElementNode;
use when_engine::dom::EventKind;
use when_engine::session::{ScriptedEvent, Session};

/// Serializes every test that touches process environment variables
static CONFIG_ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 5] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "WHEN_ENV",
    "WHEN__BACKEND__URL",
    "WHEN__RESOLVER__MAX_PASSES",
];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` and every
/// `WHEN_*` override cleared; the original environment is restored afterwards.
pub fn with_isolated_config<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    for name in ISOLATED_VARS.iter().skip(2) {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// Session over an inline JSON tree, recording callbacks in memory
pub fn session_for(tree: &str) -> Session {
    let root = ElementNode::from_json(tree).unwrap();
    Session::from_tree(&root, ResolverSettings::default())
}

fn scripted(id: &str, kind: EventKind) -> ScriptedEvent {
    ScriptedEvent {
        target: id.to_string(),
        kind,
        value: None,
        x: None,
        y: None,
    }
}

pub fn click(id: &str) -> ScriptedEvent {
    scripted(id, EventKind::Click)
}

pub fn input(id: &str, value: &str) -> ScriptedEvent {
    ScriptedEvent {
        value: Some(value.to_string()),
        ..scripted(id, EventKind::Input)
    }
}

pub fn right_click(id: &str, x: f64, y: f64) -> ScriptedEvent {
    ScriptedEvent {
        x: Some(x),
        y: Some(y),
        ..scripted(id, EventKind::ContextMenu)
    }
}

/// One-request-per-connection HTTP backend on a loopback port.
///
/// `GET /` answers with `tree`; any other request answers `{}`. Each request
/// is recorded as its request line followed by its body.
pub struct StubBackend {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
    worker: std::thread::JoinHandle<()>,
}

impl StubBackend {
    pub fn serve(tree: &'static str, connections: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let worker = std::thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let (line, body) = read_request(&mut stream);
                let reply = if line.starts_with("GET / ") { tree } else { "{}" };
                write!(
                    stream,
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.len(),
                    reply
                )
                .unwrap();
                seen.lock().unwrap().push(format!("{}\n{}", line, body));
            }
        });
        Self {
            url,
            requests,
            worker,
        }
    }

    /// Wait for every expected connection, then return what was received
    pub fn finish(self) -> Vec<String> {
        self.worker.join().unwrap();
        let requests = self.requests.lock().unwrap();
        requests.clone()
    }
}

fn read_request(stream: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length || n == 0 {
                let line = head.lines().next().unwrap_or_default().to_string();
                let body = String::from_utf8_lossy(&buf[end + 4..]).to_string();
                return (line, body);
            }
        } else if n == 0 {
            return (String::from_utf8_lossy(&buf).to_string(), String::new());
        }
    }
}
