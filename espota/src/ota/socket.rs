//! Socket operations needed by an OTA session
//!
//! The session only talks to an [OtaSocket], which lets the state machine run
//! against a real [TcpStream] as well as against a scripted device in tests.

use std::{
    io::{self, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    time::Duration,
};

use log::{debug, error, info};

use super::protocol::CONNECT_TIMEOUT;

/// A byte stream to an OTA capable device
pub trait OtaSocket: Read + Write {
    /// Set both the read and the write timeout
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Enable or disable `TCP_NODELAY`
    fn set_nodelay(&mut self, nodelay: bool) -> io::Result<()>;

    /// Limit the kernel send buffer
    fn set_send_buffer_size(&mut self, size: usize) -> io::Result<()>;

    /// Close the connection, no further I/O happens afterwards
    fn close(&mut self) -> io::Result<()>;
}

impl OtaSocket for TcpStream {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(timeout))?;
        self.set_write_timeout(Some(timeout))
    }

    fn set_nodelay(&mut self, nodelay: bool) -> io::Result<()> {
        TcpStream::set_nodelay(self, nodelay)
    }

    #[cfg(unix)]
    fn set_send_buffer_size(&mut self, size: usize) -> io::Result<()> {
        use std::os::fd::AsRawFd;

        let value = libc::c_int::try_from(size)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "send buffer too large"))?;

        // SAFETY: the descriptor is owned by `self` and `value` outlives the call
        let ret = unsafe {
            libc::setsockopt(
                self.as_raw_fd(),
                libc::SOL_SOCKET,
                libc::SO_SNDBUF,
                &value as *const libc::c_int as *const libc::c_void,
                std::mem::size_of::<libc::c_int>() as libc::socklen_t,
            )
        };

        if ret == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn set_send_buffer_size(&mut self, _size: usize) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // The device may already have hung up
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            res => res,
        }
    }
}

/// Try each address in order and return the first connection that succeeds
///
/// Addresses are probed sequentially, never in parallel.
pub fn connect_first(addrs: &[SocketAddr]) -> Option<(SocketAddr, TcpStream)> {
    for addr in addrs {
        info!("Connecting to {} port {}...", addr.ip(), addr.port());

        match TcpStream::connect_timeout(addr, CONNECT_TIMEOUT) {
            Ok(stream) => {
                info!("Connected to {}", addr.ip());
                return Some((*addr, stream));
            }
            Err(err) => {
                error!(
                    "Connecting to {} port {} failed: {}",
                    addr.ip(),
                    addr.port(),
                    err
                );
            }
        }
    }

    debug!("No candidate address accepted a connection");
    None
}
