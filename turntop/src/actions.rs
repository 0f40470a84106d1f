//! Out-of-band process termination over HTTP, independent of the live channel.
//!
//! Requests are fire-and-forget: the table only changes when a later snapshot
//! reflects the kill, so failures are logged and never surfaced as errors.

use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::Result;

/// Anything that can be asked to terminate a pid.
pub trait Terminate {
    fn terminate(&self, pid: u32);
}

#[derive(Debug, Clone)]
pub struct KillDispatcher {
    client: reqwest::Client,
    endpoint: Endpoint,
}

// Body the server answers with; both fields are advisory.
#[derive(Debug, Default, Deserialize)]
struct KillReply {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl KillDispatcher {
    /// Fails when the HTTP client cannot be built (TLS backend init).
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("turntop/", env!("CARGO_PKG_VERSION")))
            .build()
            .inspect_err(|e| warn!(error = %e, "could not build HTTP client"))?;
        Ok(Self { client, endpoint })
    }

    /// Send `POST /kill/{pid}` on a background task. The handle is only
    /// useful to tests; callers normally drop it.
    pub fn dispatch(&self, pid: u32) -> JoinHandle<()> {
        let client = self.client.clone();
        let url = self.endpoint.kill_url(pid);
        tokio::spawn(async move {
            match send_kill(&client, url).await {
                Ok(reply) if reply.status.as_deref() == Some("error") => warn!(
                    pid,
                    message = reply.message.as_deref().unwrap_or(""),
                    "server refused termination"
                ),
                Ok(reply) => info!(
                    pid,
                    message = reply.message.as_deref().unwrap_or(""),
                    "termination requested"
                ),
                Err(e) => warn!(pid, error = %e, "termination request failed"),
            }
        })
    }
}

impl Terminate for KillDispatcher {
    fn terminate(&self, pid: u32) {
        drop(self.dispatch(pid));
    }
}

async fn send_kill(client: &reqwest::Client, url: Url) -> Result<KillReply> {
    let resp = client.post(url).send().await?.error_for_status()?;
    let body = resp.text().await.unwrap_or_default();
    Ok(serde_json::from_str(&body).unwrap_or_default())
}
