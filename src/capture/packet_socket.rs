/*!
 * Packet Socket Source
 * Linux AF_PACKET raw socket receiving every Ethernet frame on one interface
 */

use super::traits::{FramePoll, FrameSource};
use crate::core::errors::CaptureError;
use crate::core::limits::CAPTURE_POLL_INTERVAL;
use crate::core::types::HostId;
use nix::errno::Errno;
use nix::net::if_::if_nametoindex;
use nix::sys::socket::{
    recvfrom, setsockopt, socket, sockopt, AddressFamily, LinkAddr, SockFlag, SockProtocol,
    SockType,
};
use nix::sys::time::{TimeVal, TimeValLike};
use std::os::fd::{AsRawFd, OwnedFd};
use tracing::{info, trace, warn};

pub struct PacketSocketSource {
    fd: OwnedFd,
    device: String,
    ifindex: usize,
}

impl PacketSocketSource {
    /// Open a raw socket and restrict delivery to `device`
    ///
    /// With `promiscuous` the interface also delivers frames addressed to
    /// other stations. Requires CAP_NET_RAW. Failures here are fatal to the
    /// caller.
    pub fn open(device: &str, promiscuous: bool) -> Result<Self, CaptureError> {
        let ifindex = if_nametoindex(device)
            .map_err(|_| CaptureError::DeviceNotFound(device.to_string()))?
            as usize;

        let fd = socket(
            AddressFamily::Packet,
            SockType::Raw,
            SockFlag::SOCK_CLOEXEC,
            SockProtocol::EthAll,
        )
        .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

        let timeout = TimeVal::milliseconds(CAPTURE_POLL_INTERVAL.as_millis() as i64);
        setsockopt(&fd, sockopt::ReceiveTimeout, &timeout)
            .map_err(|e| CaptureError::ConfigureFailed(e.to_string()))?;

        if promiscuous {
            enable_promiscuous(&fd, ifindex)?;
        } else {
            warn!(device, "promiscuous mode disabled, only frames for this station are seen");
        }

        info!(device, ifindex, promiscuous, "packet capture opened");
        Ok(Self {
            fd,
            device: device.to_string(),
            ifindex,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// The interface's own hardware address, if the kernel exposes it
    pub fn hardware_address(&self) -> Option<HostId> {
        let path = format!("/sys/class/net/{}/address", self.device);
        let raw = std::fs::read_to_string(path).ok()?;
        let mac = raw.trim().to_lowercase();
        (!mac.is_empty()).then(|| HostId::new(mac))
    }
}

/// Membership request switching `ifindex` to promiscuous reception
fn promisc_request(ifindex: usize) -> libc::packet_mreq {
    libc::packet_mreq {
        mr_ifindex: ifindex as libc::c_int,
        mr_type: libc::PACKET_MR_PROMISC as libc::c_ushort,
        mr_alen: 0,
        mr_address: [0; 8],
    }
}

/// Join the interface in promiscuous mode for the lifetime of `fd`
///
/// The kernel drops the membership when the socket closes.
fn enable_promiscuous(fd: &OwnedFd, ifindex: usize) -> Result<(), CaptureError> {
    let mreq = promisc_request(ifindex);
    // SAFETY: `fd` is an open AF_PACKET socket and `mreq` outlives the call;
    // the length passed matches the struct handed to the kernel.
    let rc = unsafe {
        libc::setsockopt(
            fd.as_raw_fd(),
            libc::SOL_PACKET,
            libc::PACKET_ADD_MEMBERSHIP,
            &mreq as *const libc::packet_mreq as *const libc::c_void,
            std::mem::size_of::<libc::packet_mreq>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(CaptureError::ConfigureFailed(format!(
            "promiscuous mode: {}",
            Errno::last()
        )));
    }
    Ok(())
}

impl FrameSource for PacketSocketSource {
    fn poll_frame(&mut self, buf: &mut [u8]) -> Result<FramePoll, CaptureError> {
        match recvfrom::<LinkAddr>(self.fd.as_raw_fd(), buf) {
            Ok((len, from)) => {
                // The socket sees every interface; keep ours only
                match from {
                    Some(addr) if addr.ifindex() != self.ifindex => {
                        trace!(ifindex = addr.ifindex(), "frame from other interface");
                        Ok(FramePoll::Idle)
                    }
                    _ => Ok(FramePoll::Frame(len)),
                }
            }
            Err(Errno::EAGAIN) | Err(Errno::EINTR) => Ok(FramePoll::Idle),
            Err(e) => Err(CaptureError::ReadFailed(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("packet socket on {} (ifindex {})", self.device, self.ifindex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promisc_request_layout() {
        let mreq = promisc_request(7);
        assert_eq!(mreq.mr_ifindex, 7);
        assert_eq!(mreq.mr_type as libc::c_int, libc::PACKET_MR_PROMISC);
        assert_eq!(mreq.mr_alen, 0);
        assert_eq!(mreq.mr_address, [0; 8]);
    }

    #[test]
    fn test_unknown_device_is_reported() {
        let result = PacketSocketSource::open("sonifier-none0", true);
        assert!(matches!(result, Err(CaptureError::DeviceNotFound(d)) if d == "sonifier-none0"));
    }
}
