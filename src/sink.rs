//! UDP transport for outgoing packets.
//!
//! A [`UdpSink`] is opened once per session in connected mode: the
//! socket binds an ephemeral local port and connects to the single
//! destination, so every send goes to the same receiver. Dropping the
//! sink closes the socket.

use std::net::{SocketAddr, SocketAddrV4};

use tokio::net::UdpSocket;

use crate::error::Result;

/// A UDP sink that sends datagrams to one destination.
pub struct UdpSink {
    name: String,
    socket: UdpSocket,
    destination: SocketAddrV4,
    bytes_written: u64,
}

impl UdpSink {
    /// Open a sink connected to the given destination.
    ///
    /// Binds an ephemeral local port. Fails if the socket cannot be
    /// created or connected; callers treat that as fatal and never
    /// retry.
    pub async fn connect(destination: SocketAddrV4) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(destination).await?;
        let local_addr = socket.local_addr()?;

        Ok(Self {
            name: format!("udpsink-{}->{}", local_addr, destination),
            socket,
            destination,
            bytes_written: 0,
        })
    }

    /// Send one datagram.
    ///
    /// Completes or fails atomically for the caller; there is no
    /// partial send at datagram granularity.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.socket.send(data).await?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    /// Get the destination address.
    pub fn destination(&self) -> SocketAddrV4 {
        self.destination
    }

    /// Get the local address this socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Get the number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Get the name of this sink.
    pub fn name(&self) -> &str {
        &self.name
    }
}
