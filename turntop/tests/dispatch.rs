//! Action dispatcher: one POST per activation, failures absorbed.

use std::cell::RefCell;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use turntop::actions::{KillDispatcher, Terminate};
use turntop::endpoint::Endpoint;
use turntop::session::Session;

type Seen = Arc<Mutex<Vec<String>>>;

/// Minimal HTTP/1.1 server recording each request line.
async fn spawn_recorder(reply: &'static str) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::default();
    let seen_srv = seen.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else { return };
            let seen = seen_srv.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match sock.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf);
                let line = head.lines().next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(line);
                let resp = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    reply.len(),
                    reply
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    (format!("http://{addr}"), seen)
}

#[tokio::test]
async fn terminate_sends_exactly_one_post_for_pid() {
    let (base, seen) =
        spawn_recorder(r#"{"status": "success", "message": "Process 42 terminated."}"#).await;
    let dispatcher = KillDispatcher::new(Endpoint::parse(&base, 50, 3.0).unwrap()).unwrap();

    timeout(Duration::from_secs(5), dispatcher.dispatch(42))
        .await
        .unwrap()
        .unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["POST /kill/42 HTTP/1.1".to_string()]);
}

#[tokio::test]
async fn server_side_refusal_is_only_logged() {
    let (base, seen) =
        spawn_recorder(r#"{"status": "error", "message": "Process not found."}"#).await;
    let dispatcher = KillDispatcher::new(Endpoint::parse(&base, 50, 3.0).unwrap()).unwrap();
    // completes without panicking
    timeout(Duration::from_secs(5), dispatcher.dispatch(99999))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_server_is_absorbed() {
    let addr = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let dispatcher =
        KillDispatcher::new(Endpoint::parse(&format!("http://{addr}"), 50, 3.0).unwrap())
            .unwrap();
    let res = timeout(Duration::from_secs(5), dispatcher.dispatch(1)).await.unwrap();
    assert!(res.is_ok(), "dispatch task must not panic on transport failure");
}

struct Recorder(RefCell<Vec<u32>>);

impl Terminate for Recorder {
    fn terminate(&self, pid: u32) {
        self.0.borrow_mut().push(pid);
    }
}

#[test]
fn control_targets_captured_pid_under_any_filter() {
    let mut s = Session::new();
    s.apply_frame(r#"{"items": [{"pid": 1, "name": "init"}, {"pid": 42, "name": "bash"}]}"#)
        .unwrap();
    s.set_filter("4");
    // bash is the first visible row now, though second in the snapshot
    let control = s.view().rows[0].kill.expect("bash has a pid");

    // later re-filters do not retarget an already captured control
    s.clear_filter();
    s.set_filter("init");

    let rec = Recorder(RefCell::new(Vec::new()));
    control.activate(&rec);
    assert_eq!(rec.0.into_inner(), vec![42]);
}
