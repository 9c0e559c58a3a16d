use crate::adb::sync::SyncTransport;
use crate::error::{AdbError, Result};
use log::*;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

// Constants
const STATUS_OKAY: &[u8; 4] = b"OKAY";
const STATUS_FAIL: &[u8; 4] = b"FAIL";
const MAX_COMMAND_LENGTH: usize = 0xffff;

/// Byte stream a [`Transport`] runs over
pub trait Socket: Read + Write + Send {
    /// Shut down both directions. Wakes any thread blocked reading this socket.
    fn shutdown(&self) -> io::Result<()>;

    /// Open a second handle on the same connection
    fn try_clone_socket(&self) -> io::Result<Box<dyn Socket>>;
}

impl Socket for TcpStream {
    fn shutdown(&self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn try_clone_socket(&self) -> io::Result<Box<dyn Socket>> {
        Ok(Box::new(self.try_clone()?))
    }
}

/// Handle that closes a transport from another thread
pub struct TransportCloser {
    socket: Box<dyn Socket>,
}

impl TransportCloser {
    pub fn close(&self) -> Result<()> {
        debug!("Closing transport from closer handle");
        self.socket.shutdown()?;
        Ok(())
    }
}

/// One request/response exchange with the ADB host daemon.
///
/// Commands go out as `<4 hex digit length><command>`, replies start with a
/// 4-byte `OKAY`/`FAIL` status. A transport can be turned into a raw byte
/// stream ([`Transport::into_stream`]) or a sync-protocol handler
/// ([`Transport::start_sync`]); both consume it, so the mode switch is one-way.
pub struct Transport {
    socket: Box<dyn Socket>,
    closed: bool,
}

impl Transport {
    /// Wrap an already connected socket
    pub fn new(socket: Box<dyn Socket>) -> Self {
        Self {
            socket,
            closed: false,
        }
    }

    /// Send a command with its hex length prefix
    pub fn send(&mut self, command: &str) -> Result<()> {
        let bytes = command.as_bytes();
        if bytes.len() > MAX_COMMAND_LENGTH {
            return Err(AdbError::InvalidRequest(format!(
                "command is {} bytes, limit is {}",
                bytes.len(),
                MAX_COMMAND_LENGTH
            )));
        }

        debug!("Sending command: {}", command);
        let mut request = Vec::with_capacity(4 + bytes.len());
        request.extend_from_slice(format!("{:04x}", bytes.len()).as_bytes());
        request.extend_from_slice(bytes);
        self.write_all(&request)?;
        self.flush()
    }

    /// Read the status token and turn `FAIL` into a protocol error
    pub fn verify_response(&mut self) -> Result<()> {
        let mut status = [0u8; 4];
        match self.read_exact(&mut status) {
            Ok(()) => {}
            Err(AdbError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(AdbError::MalformedResponse(
                    "connection closed before status".into(),
                ));
            }
            Err(e) => return Err(e),
        }
        debug!("Status: {:?}", String::from_utf8_lossy(&status));

        match &status {
            STATUS_OKAY => Ok(()),
            STATUS_FAIL => {
                let message = self.read_string()?;
                debug!("Daemon reported failure: {}", message);
                Err(AdbError::Protocol(message))
            }
            _ => Err(AdbError::MalformedResponse(format!(
                "expected OKAY or FAIL, got {:?}",
                String::from_utf8_lossy(&status)
            ))),
        }
    }

    /// Read one length-prefixed payload
    pub fn read_string(&mut self) -> Result<String> {
        self.read_frame()?.ok_or_else(|| {
            AdbError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before payload",
            ))
        })
    }

    /// Read one length-prefixed payload, or `None` when the peer closed the
    /// connection cleanly before the next frame started.
    pub fn read_frame(&mut self) -> Result<Option<String>> {
        let mut prefix = [0u8; 4];
        let first = loop {
            self.ensure_open()?;
            match self.socket.read(&mut prefix) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if first == 0 {
            debug!("Peer closed the connection between frames");
            return Ok(None);
        }
        self.read_exact(&mut prefix[first..])?;

        let length = parse_hex_length(&prefix)?;
        let mut payload = vec![0u8; length];
        self.read_exact(&mut payload)?;

        let text = String::from_utf8_lossy(&payload).into_owned();
        trace!("Payload ({} bytes): {:?}", length, text);
        Ok(Some(text))
    }

    /// Copy everything the device sends until it closes the channel
    pub fn read_response_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64> {
        self.ensure_open()?;
        let copied = io::copy(&mut self.socket, sink)?;
        debug!("Copied {} bytes of raw output", copied);
        Ok(copied)
    }

    /// Hand the connection over to a raw output stream
    pub fn into_stream(self) -> TransportStream {
        TransportStream { transport: self }
    }

    /// Switch this connection to the sync sub-protocol.
    ///
    /// Only valid once the device channel is negotiated and `sync:` was
    /// answered with OKAY; the caller sends `sync:` first.
    pub fn start_sync(self) -> SyncTransport {
        debug!("Switching transport to sync mode");
        SyncTransport::new(self)
    }

    /// Handle for closing this transport from another thread
    pub fn closer(&self) -> Result<TransportCloser> {
        Ok(TransportCloser {
            socket: self.socket.try_clone_socket()?,
        })
    }

    /// Release the connection. Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("Closing transport");
        self.socket.shutdown()?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.socket.write_all(buf)?;
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.socket.flush()?;
        Ok(())
    }

    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_open()?;
        self.socket.read_exact(buf)?;
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(AdbError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "transport is closed",
            )));
        }
        Ok(())
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!("Ignoring error while closing transport: {}", e);
        }
    }
}

/// Raw output of a shell or exec channel.
///
/// Owns the underlying transport and closes it exactly once: when the
/// device closes its end, on [`TransportStream::close`], or on drop.
pub struct TransportStream {
    transport: Transport,
}

impl TransportStream {
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }
}

impl Read for TransportStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.transport.closed {
            return Ok(0);
        }
        let n = self.transport.socket.read(buf)?;
        if n == 0 && !buf.is_empty() {
            debug!("Output stream exhausted");
            if let Err(e) = self.transport.close() {
                debug!("Ignoring error while closing exhausted stream: {}", e);
            }
        }
        Ok(n)
    }
}

/// Decode a 4 hex digit length, either case
pub(crate) fn parse_hex_length(prefix: &[u8; 4]) -> Result<usize> {
    if !prefix.iter().all(u8::is_ascii_hexdigit) {
        return Err(AdbError::MalformedResponse(format!(
            "invalid length prefix {:?}",
            String::from_utf8_lossy(prefix)
        )));
    }
    let digits = std::str::from_utf8(prefix)
        .map_err(|e| AdbError::MalformedResponse(e.to_string()))?;
    usize::from_str_radix(digits, 16).map_err(|e| AdbError::MalformedResponse(e.to_string()))
}
