//! Datagram transport to a bridge.

use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::{UdpSocket, lookup_host};

use crate::error::LimitlessError;
use crate::opcode::Datagram;

/// Sends raw datagrams to one bridge. There is no acknowledgement.
pub trait Transport: Send {
    fn send(&mut self, datagram: &Datagram) -> impl Future<Output = io::Result<()>> + Send;
}

/// A UDP socket connected to the bridge address.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Resolve `host` and connect an ephemeral local socket of the same
    /// address family to it.
    ///
    /// # Errors
    ///
    /// Returns [`LimitlessError::Unresolved`] when `host` has no address and
    /// [`LimitlessError::Io`] when the socket can't be bound or connected.
    pub async fn connect(host: &str, port: u16) -> Result<Self, LimitlessError> {
        let remote = lookup_host((host, port))
            .await?
            .next()
            .ok_or_else(|| LimitlessError::Unresolved {
                host: host.to_string(),
                port,
            })?;
        let local: SocketAddr = if remote.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(remote).await?;
        tracing::debug!(%remote, "bridge socket connected");
        Ok(Self { socket })
    }

    /// Address of the bridge this transport sends to.
    ///
    /// # Errors
    ///
    /// Returns the socket error if the peer address can't be read.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }
}

impl Transport for UdpTransport {
    async fn send(&mut self, datagram: &Datagram) -> io::Result<()> {
        self.socket.send(datagram).await.map(|_| ())
    }
}
