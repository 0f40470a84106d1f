//! Server addressing: one base URL yields both the live channel and the action URLs.

use url::Url;

use crate::error::{ConsoleError, Result};

pub const DEFAULT_TOP_N: u32 = 50;
pub const DEFAULT_QUANTUM: f64 = 3.0;
// The server rejects larger pages.
pub const MAX_TOP_N: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    base: Url,
    pub top_n: u32,
    pub quantum: f64,
}

impl Endpoint {
    /// Accepts `http(s)://host[:port][/prefix]` or the live URL itself (`ws(s)://.../ws`).
    pub fn parse(raw: &str, top_n: u32, quantum: f64) -> Result<Self> {
        let raw = raw.trim();
        let mut base = Url::parse(raw).map_err(|e| ConsoleError::endpoint(raw, e.to_string()))?;
        match base.scheme() {
            "http" | "https" | "ws" | "wss" => {}
            other => {
                return Err(ConsoleError::endpoint(
                    raw,
                    format!("unsupported scheme '{other}'"),
                ))
            }
        }
        if base.host_str().map_or(true, str::is_empty) {
            return Err(ConsoleError::endpoint(raw, "missing host"));
        }
        if !(1..=MAX_TOP_N).contains(&top_n) {
            return Err(ConsoleError::config(format!(
                "top_n must be between 1 and {MAX_TOP_N}, got {top_n}"
            )));
        }
        if !(quantum.is_finite() && quantum > 0.0) {
            return Err(ConsoleError::config(format!(
                "quantum must be greater than 0, got {quantum}"
            )));
        }

        let trimmed = base.path().trim_end_matches('/');
        let prefix = trimmed.strip_suffix("/ws").unwrap_or(trimmed).to_string();
        base.set_path(&prefix);
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self {
            base,
            top_n,
            quantum,
        })
    }

    fn prefix(&self) -> &str {
        self.base.path().trim_end_matches('/')
    }

    /// Live channel: `ws(s)://host/ws?top_n=N&quantum=Q`.
    pub fn ws_url(&self) -> Url {
        let mut u = self.base.clone();
        let scheme = match u.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        // http/https/ws/wss are all special schemes, so switching between them cannot fail
        let _ = u.set_scheme(scheme);
        u.set_path(&format!("{}/ws", self.prefix()));
        u.query_pairs_mut()
            .clear()
            .append_pair("top_n", &self.top_n.to_string())
            .append_pair("quantum", &self.quantum.to_string());
        u
    }

    /// Base for out-of-band actions: the server root over http(s).
    pub fn action_base(&self) -> Url {
        let mut u = self.base.clone();
        let scheme = match u.scheme() {
            "https" | "wss" => "https",
            _ => "http",
        };
        let _ = u.set_scheme(scheme);
        u
    }

    /// Action side channel: `http(s)://host/kill/{pid}`.
    pub fn kill_url(&self, pid: u32) -> Url {
        let mut u = self.action_base();
        u.set_path(&format!("{}/kill/{pid}", self.prefix()));
        u
    }

    /// `host[:port]`, for display.
    pub fn authority(&self) -> String {
        let host = self.base.host_str().unwrap_or_default();
        match self.base.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}
