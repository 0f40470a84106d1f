//! Live channel supervision: one websocket to the server, reconnected after a
//! fixed delay whenever it closes.
//!
//! [`Supervisor`] is the pure state machine; [`LinkHandle::spawn`] runs it
//! against a real socket on its own task and reports to the UI loop over mpsc.

use std::{pin::Pin, time::Duration};

use futures_util::StreamExt;
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{sleep, Sleep},
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

// Link task -> UI loop buffer. Frames are small and the UI drains continuously.
const EVENT_BUFFER: usize = 64;

// Connect to the server and return the WS stream
pub async fn connect(url: &str) -> Result<WsStream> {
    let (ws, _) = connect_async(url).await?;
    Ok(ws)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Live,
    Error,
    Reconnecting,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Live => "Live",
            ConnectionStatus::Error => "Error",
            ConnectionStatus::Reconnecting => "Reconnecting",
        }
    }
}

/// What happened to the physical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Opened,
    Failed,
    Closed,
    ReconnectDue,
}

#[derive(Debug, Clone)]
pub struct Supervisor {
    status: ConnectionStatus,
    reconnect_pending: bool,
    delay: Duration,
}

impl Supervisor {
    pub fn new(delay: Duration) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            reconnect_pending: false,
            delay,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    /// Apply a transport event. Returns `Some(delay)` when the caller must arm
    /// the reconnect timer; at most one timer is ever outstanding.
    pub fn handle(&mut self, event: Transport) -> Option<Duration> {
        match event {
            Transport::Opened => {
                self.status = ConnectionStatus::Live;
                None
            }
            Transport::Failed => {
                self.status = ConnectionStatus::Error;
                None
            }
            Transport::Closed => {
                self.status = ConnectionStatus::Reconnecting;
                if self.reconnect_pending {
                    None
                } else {
                    self.reconnect_pending = true;
                    Some(self.delay)
                }
            }
            Transport::ReconnectDue => {
                self.reconnect_pending = false;
                self.status = ConnectionStatus::Connecting;
                None
            }
        }
    }
}

/// What the link task tells the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Status(ConnectionStatus),
    /// Raw text frame; decoding belongs to the session.
    Frame(String),
}

/// Owner of the running link task.
///
/// [`LinkHandle::shutdown`] closes the socket and cancels a pending reconnect;
/// dropping the handle aborts the task outright.
pub struct LinkHandle {
    events: mpsc::Receiver<LinkEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl LinkHandle {
    pub fn spawn(url: Url, delay: Duration) -> Self {
        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_link(url, delay, tx, shutdown_rx));
        Self {
            events,
            shutdown: Some(shutdown),
            task,
        }
    }

    pub async fn recv(&mut self) -> Option<LinkEvent> {
        self.events.recv().await
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for LinkHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn report(tx: &mpsc::Sender<LinkEvent>, status: ConnectionStatus) -> bool {
    debug!(status = status.label(), "link status");
    tx.send(LinkEvent::Status(status)).await.is_ok()
}

async fn run_link(
    url: Url,
    delay: Duration,
    tx: mpsc::Sender<LinkEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut sup = Supervisor::new(delay);
    let mut pending: Option<Pin<Box<Sleep>>> = None;

    loop {
        if let Some(timer) = pending.as_mut() {
            tokio::select! {
                _ = &mut shutdown => return,
                _ = timer.as_mut() => {}
            }
            pending = None;
            sup.handle(Transport::ReconnectDue);
        }

        if !report(&tx, sup.status()).await {
            return;
        }
        info!(%url, "connecting");
        let connected = tokio::select! {
            _ = &mut shutdown => return,
            res = connect(url.as_str()) => res,
        };

        match connected {
            Ok(mut ws) => {
                sup.handle(Transport::Opened);
                info!(%url, "live channel open");
                if !report(&tx, sup.status()).await {
                    let _ = ws.close(None).await;
                    return;
                }
                loop {
                    let msg = tokio::select! {
                        _ = &mut shutdown => {
                            let _ = ws.close(None).await;
                            return;
                        }
                        msg = ws.next() => msg,
                    };
                    let text = match msg {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                            Ok(text) => text,
                            Err(_) => {
                                warn!("dropping non-UTF-8 binary frame");
                                continue;
                            }
                        },
                        Some(Ok(Message::Close(frame))) => {
                            info!(?frame, "server closed live channel");
                            break;
                        }
                        // ping/pong are answered by tungstenite
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            warn!(error = %e, "live channel error");
                            sup.handle(Transport::Failed);
                            if !report(&tx, sup.status()).await {
                                return;
                            }
                            break;
                        }
                        None => {
                            info!("live channel ended");
                            break;
                        }
                    };
                    if tx.send(LinkEvent::Frame(text)).await.is_err() {
                        let _ = ws.close(None).await;
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "connect failed");
                sup.handle(Transport::Failed);
                if !report(&tx, sup.status()).await {
                    return;
                }
            }
        }

        if let Some(d) = sup.handle(Transport::Closed) {
            debug!(delay_ms = d.as_millis() as u64, "reconnect scheduled");
            pending = Some(Box::pin(sleep(d)));
        }
        if !report(&tx, sup.status()).await {
            return;
        }
    }
}
