//! Wake-on-LAN magic packet framing and broadcast.
//!
//! The frame is 6 bytes of `0xFF` followed by 16 repetitions of the target
//! MAC, sent as UDP broadcast. Discard ports 9 and 7 are both tried since
//! NIC firmware only looks at the payload, not the port.

use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use powernap_core::MacAddr;

use crate::error::WakeError;

/// Magic packet size: 6-byte sync stream + 16 MAC repetitions.
const PACKET_LEN: usize = 102;

/// Ports the packet is broadcast to, in order.
const WOL_PORTS: [u16; 2] = [9, 7];

/// Build the 102-byte magic packet for `mac`.
fn magic_packet(mac: MacAddr) -> [u8; PACKET_LEN] {
    let mac = mac.to_bytes();
    let mut pkt = [0u8; PACKET_LEN];
    pkt[..6].fill(0xFF);
    for rep in 0..16 {
        let base = 6 + rep * 6;
        pkt[base..base + 6].copy_from_slice(&mac);
    }
    pkt
}

/// Broadcast a magic packet for `mac`.
///
/// `broadcast` overrides the destination for routed segments where the
/// limited broadcast address does not reach the host; it defaults to
/// `255.255.255.255`.
///
/// The send succeeds if the packet was accepted for at least one port.
///
/// # Errors
///
/// Returns [`WakeError`] if the socket cannot be prepared or no port
/// accepted the packet.
pub fn send_magic_packet(mac: MacAddr, broadcast: Option<Ipv4Addr>) -> Result<(), WakeError> {
    let target = broadcast.unwrap_or(Ipv4Addr::BROADCAST);
    let pkt = magic_packet(mac);

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).map_err(WakeError::Bind)?;
    socket.set_broadcast(true).map_err(WakeError::Broadcast)?;

    let mut last_err = None;
    for port in WOL_PORTS {
        let addr = SocketAddrV4::new(target, port);
        match socket.send_to(&pkt, addr) {
            Ok(_) => return Ok(()),
            Err(e) => {
                tracing::debug!(%target, port, error = %e, "magic packet send failed");
                last_err = Some(e);
            }
        }
    }

    Err(WakeError::Send {
        target,
        source: last_err.expect("at least one port was attempted"),
    })
}
