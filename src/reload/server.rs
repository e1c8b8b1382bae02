//! WebSocket hub for reload clients.
//!
//! An acceptor thread performs the handshake and registers each client.
//! Clients never talk back, so the hub only writes.

use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::ReloadMessage;
use crate::{debug, log};

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Limit on a client that connects but never finishes the handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connected reload clients, shared between the acceptor and the watcher.
#[derive(Clone, Default)]
pub struct ReloadHub {
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
}

impl ReloadHub {
    /// Complete the handshake and greet the client.
    pub fn add_client(&self, stream: TcpStream) {
        let _ = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT));

        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let hello = ReloadMessage::connected().to_json();
                if let Err(e) = ws.send(Message::Text(hello.into())) {
                    log!("reload"; "failed to send connected message: {}", e);
                    return;
                }
                let mut clients = self.clients.lock();
                clients.push(ws);
                debug!("reload"; "client connected (total: {})", clients.len());
            }
            Err(e) => debug!("reload"; "handshake failed: {}", e),
        }
    }

    /// Send to every client, dropping the ones that went away.
    ///
    /// Returns the number of clients still connected.
    pub fn broadcast(&self, message: &ReloadMessage) -> usize {
        let json = message.to_json();
        let mut clients = self.clients.lock();
        clients.retain_mut(|ws| ws.send(Message::Text(json.clone().into())).is_ok());
        clients.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Bind the WebSocket port and accept clients on a background thread.
///
/// Returns the port actually bound, which may be above `base_port`.
pub fn start_ws_server(interface: IpAddr, base_port: u16, hub: ReloadHub) -> Result<u16> {
    let (listener, actual_port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        while !crate::core::is_shutdown() {
            match listener.accept() {
                Ok((stream, addr)) => {
                    debug!("reload"; "client from {}", addr);
                    let _ = stream.set_nonblocking(false);
                    hub.add_client(stream);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    log!("reload"; "accept error: {}", e);
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    });

    Ok(actual_port)
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Instant;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_try_bind_port_skips_taken_port() {
        let taken = TcpListener::bind((LOCALHOST, 0)).unwrap();
        let port = taken.local_addr().unwrap().port();

        assert!(try_bind_port(LOCALHOST, port, 1).is_err());

        match try_bind_port(LOCALHOST, port, MAX_PORT_RETRIES) {
            Ok((_listener, bound)) => assert_ne!(bound, port),
            // Every port in the range may be busy on a crowded host
            Err(e) => assert!(e.to_string().contains("after 10 attempts")),
        }
    }

    #[test]
    fn test_broadcast_reaches_connected_client() {
        let hub = ReloadHub::default();
        let port = start_ws_server(LOCALHOST, 0, hub.clone()).unwrap();

        let (mut socket, _) = tungstenite::connect(format!("ws://127.0.0.1:{port}/")).unwrap();
        let hello: ReloadMessage =
            serde_json::from_str(socket.read().unwrap().to_text().unwrap()).unwrap();
        assert_eq!(hello, ReloadMessage::connected());

        let deadline = Instant::now() + Duration::from_secs(5);
        while hub.client_count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(hub.broadcast(&ReloadMessage::reload("index.html")), 1);

        let reload: ReloadMessage =
            serde_json::from_str(socket.read().unwrap().to_text().unwrap()).unwrap();
        assert_eq!(reload, ReloadMessage::reload("index.html"));
    }

    #[test]
    fn test_broadcast_without_clients() {
        let hub = ReloadHub::default();
        assert_eq!(hub.broadcast(&ReloadMessage::reload("x")), 0);
        assert_eq!(hub.client_count(), 0);
    }
}
