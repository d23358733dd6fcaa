/*!
 * Control Listener
 * UDP endpoint accepting report-period updates
 *
 * Accepted payloads:
 * - OSC message `/delay` with one int or float argument (milliseconds)
 * - plain ASCII decimal milliseconds, e.g. `echo 500 | nc -u host 9002`
 */

use crate::core::errors::{ControlError, SonifierError};
use crate::core::limits::{DELAY_CONTROL_ADDRESS, MAX_CONTROL_DATAGRAM};
use crate::core::shutdown::ShutdownListener;
use crate::emit::osc::{self, OscArg};
use crate::engine::DelayCell;
use crate::monitoring::SonifierStats;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{info, warn};

/// Extract the requested delay in milliseconds from a control datagram
pub fn parse_delay_command(datagram: &[u8]) -> Result<i64, ControlError> {
    if datagram.first() == Some(&b'/') {
        let packet = osc::decode(datagram)?;
        if packet.address != DELAY_CONTROL_ADDRESS {
            return Err(ControlError::UnsupportedAddress(packet.address));
        }
        return match packet.args.as_slice() {
            [OscArg::Int(ms)] => Ok(i64::from(*ms)),
            [OscArg::Float(ms)] if ms.is_finite() => Ok(ms.round() as i64),
            other => Err(ControlError::Malformed(format!(
                "expected one numeric argument, got {:?}",
                other
            ))),
        };
    }

    let text = std::str::from_utf8(datagram)
        .map_err(|e| ControlError::Malformed(e.to_string()))?
        .trim_matches(|c: char| c.is_whitespace() || c == '\0' || c == ';');
    text.parse::<i64>()
        .map_err(|_| ControlError::Malformed(format!("'{}' is not a number", text)))
}

/// Bound control socket
pub struct ControlListener {
    socket: UdpSocket,
}

impl ControlListener {
    pub async fn bind(addr: SocketAddr) -> Result<Self, SonifierError> {
        let socket = UdpSocket::bind(addr).await?;
        info!(addr = %socket.local_addr()?, "control listener bound");
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SonifierError> {
        Ok(self.socket.local_addr()?)
    }

    /// Apply delay updates until shutdown
    ///
    /// The new period takes effect on each loop's next sleep.
    pub async fn run(
        self,
        delays: Arc<DelayCell>,
        stats: Arc<SonifierStats>,
        mut shutdown: ShutdownListener,
    ) {
        let mut buf = vec![0u8; MAX_CONTROL_DATAGRAM];
        loop {
            tokio::select! {
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => {
                        match parse_delay_command(&buf[..len]).and_then(|ms| {
                            delays.set_report_millis(ms).map(|previous| (previous, ms))
                        }) {
                            Ok((previous, ms)) => {
                                stats.inc_control_updates();
                                info!(
                                    peer = %peer,
                                    previous_ms = previous,
                                    report_ms = ms,
                                    reset_ms = delays.reset().as_millis() as u64,
                                    "tick delay updated"
                                );
                            }
                            Err(e) => warn!(peer = %peer, error = %e, "control message rejected"),
                        }
                    }
                    Err(e) => warn!(error = %e, "control receive failed"),
                },
                _ = shutdown.wait() => {
                    info!("control listener shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shutdown::Shutdown;
    use crate::emit::ControlMessage;
    use std::time::Duration;

    fn osc_delay(ms: u32) -> Vec<u8> {
        let msg = ControlMessage {
            address: DELAY_CONTROL_ADDRESS.to_string(),
            args: vec![ms],
        };
        osc::encode(&msg).unwrap().to_vec()
    }

    #[test]
    fn test_parse_osc_delay() {
        assert_eq!(parse_delay_command(&osc_delay(500)).unwrap(), 500);
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse_delay_command(b"750\n").unwrap(), 750);
        assert_eq!(parse_delay_command(b"250;").unwrap(), 250);
        assert!(parse_delay_command(b"fast").is_err());
    }

    #[test]
    fn test_rejects_other_address() {
        let msg = ControlMessage::instrument("kick", &[1]);
        let bytes = osc::encode(&msg).unwrap();
        assert!(matches!(
            parse_delay_command(&bytes),
            Err(ControlError::UnsupportedAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_listener_updates_delay() {
        let delays = Arc::new(DelayCell::default());
        let stats = Arc::new(SonifierStats::new());
        let shutdown = Shutdown::new();

        let listener = ControlListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(listener.run(delays.clone(), stats.clone(), shutdown.listener()));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(b"0", addr).await.unwrap();
        client.send_to(&osc_delay(500), addr).await.unwrap();

        tokio::time::timeout(Duration::from_secs(2), async {
            while delays.report_millis() != 500 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(delays.reset(), Duration::from_millis(2_000));
        assert_eq!(stats.snapshot().control_updates, 1);

        shutdown.trigger();
        task.await.unwrap();
    }
}
