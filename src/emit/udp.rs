/*!
 * UDP Control Sink
 * Sends OSC control messages to the synthesis backend, one datagram each
 */

use super::message::ControlMessage;
use super::osc;
use super::traits::ControlSink;
use crate::core::errors::EmitError;
use std::io::ErrorKind;
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info};

/// Connected datagram socket on the runtime's reactor
///
/// Sends never block the report task: a full socket buffer surfaces as a
/// transport error for that message.
pub struct UdpControlSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpControlSink {
    /// Resolve `host:port` and connect an ephemeral UDP socket to it
    pub async fn connect(host: &str, port: u16) -> Result<Self, EmitError> {
        let target = lookup_host((host, port))
            .await
            .map_err(|e| EmitError::AddressUnresolved(format!("{}:{} ({})", host, port, e)))?
            .next()
            .ok_or_else(|| EmitError::AddressUnresolved(format!("{}:{}", host, port)))?;

        let bind_addr: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| EmitError::Transport(e.to_string()))?;
        socket
            .connect(target)
            .await
            .map_err(|e| EmitError::Transport(e.to_string()))?;

        info!(target = %target, "control sink connected");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl ControlSink for UdpControlSink {
    fn send(&self, message: &ControlMessage) -> Result<(), EmitError> {
        let datagram = osc::encode(message)?;
        self.socket.try_send(&datagram).map_err(|e| match e.kind() {
            ErrorKind::WouldBlock => EmitError::Transport("socket send buffer full".into()),
            _ => EmitError::Transport(e.to_string()),
        })?;
        debug!(address = %message.address, args = ?message.args, "control message sent");
        Ok(())
    }
}
