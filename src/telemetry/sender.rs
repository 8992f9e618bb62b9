use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use super::message::TelemetryMessage;
use crate::error::TelemetryError;

/// Fire-and-forget UDP sender for per-frame tracking geometry.
///
/// Owns its socket for the lifetime of the run: bound to an unspecified
/// local port at construction and dropped with the session. The socket
/// is non-blocking so a stalled transport cannot stall the tracking
/// loop. One datagram goes out per tracked frame; there is no
/// acknowledgment, retry, or delivery guarantee.
#[derive(Debug)]
pub struct TelemetrySender {
    socket: UdpSocket,
    endpoint: SocketAddr,
}

impl TelemetrySender {
    /// Bind a local socket for sending to `endpoint`.
    pub fn new(endpoint: SocketAddr) -> Result<Self, TelemetryError> {
        let local: SocketAddr = if endpoint.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).map_err(TelemetryError::Bind)?;
        socket.set_nonblocking(true).map_err(TelemetryError::Bind)?;
        Ok(Self { socket, endpoint })
    }

    /// Destination address for this run.
    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    /// Send one message. Best-effort; the caller decides whether a
    /// failure matters.
    pub fn send(&self, message: &TelemetryMessage) -> Result<(), TelemetryError> {
        let payload = message.wire_format();
        self.socket
            .send_to(payload.as_bytes(), self.endpoint)
            .map_err(|source| TelemetryError::Send {
                endpoint: self.endpoint,
                source,
            })?;
        Ok(())
    }
}
