use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use crate::MetricResult;

/// Transport a client writes finished packets to.
///
/// Every call to [`Writer::write`] carries exactly one packet. Implementations
/// are shared between all sends of a client, including sends running on other
/// threads, so they must be `Send + Sync`. If a write is not atomic per call,
/// the implementation has to serialize writes itself.
pub trait Writer: Send + Sync {
    /// Sends one packet.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the packet could not be sent.
    fn write(&self, buf: &[u8]) -> std::io::Result<usize>;

    /// Releases the transport. Called once, when the owning client is closed.
    ///
    /// # Errors
    /// Returns the underlying I/O error if releasing the transport fails.
    fn close(&self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<T> Writer for &T
where
    T: Writer,
{
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (*self).write(buf)
    }

    fn close(&self) -> std::io::Result<()> {
        (*self).close()
    }
}

impl<T> Writer for std::sync::Arc<T>
where
    T: Writer + ?Sized,
{
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (**self).write(buf)
    }

    fn close(&self) -> std::io::Result<()> {
        (**self).close()
    }
}

impl Writer for Box<dyn Writer> {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (**self).write(buf)
    }

    fn close(&self) -> std::io::Result<()> {
        (**self).close()
    }
}

/// Sends packets over an unconnected UDP socket.
#[derive(Debug)]
pub struct UdpSocketWriter {
    sock: UdpSocket,
    destination_addr: SocketAddr,
}

impl UdpSocketWriter {
    /// Resolves `host:port` and binds an ephemeral local socket of the same
    /// address family.
    ///
    /// # Errors
    /// Returns an error if the address does not resolve or the socket cannot be bound.
    pub fn connect(host: &str, port: u16) -> MetricResult<Self> {
        let destination_addr = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("no address found for {host}:{port}"),
            )
        })?;

        let bind_addr: SocketAddr = if destination_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        Ok(Self::new(UdpSocket::bind(bind_addr)?, destination_addr))
    }

    /// Wraps an already bound socket.
    #[must_use]
    pub const fn new(sock: UdpSocket, destination_addr: SocketAddr) -> Self {
        Self {
            sock,
            destination_addr,
        }
    }

    /// Where packets are sent.
    #[must_use]
    pub const fn destination(&self) -> SocketAddr {
        self.destination_addr
    }

    /// Local address of the sending socket.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the address cannot be queried.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.sock.local_addr()
    }
}

impl Writer for UdpSocketWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        let r = self.sock.send_to(buf, self.destination_addr);
        if let Err(ref err) = r {
            tracing::warn!("UDP send error: {err}");
        }
        r
    }
}
