use crate::adb::protocol::sync;
use crate::adb::remote_file::RemoteFileRecord;
use crate::adb::transport::Transport;
use crate::error::{AdbError, Result};
use bytes::{BufMut, BytesMut};
use log::*;
use std::io::{ErrorKind, Read, Write};

/// File sub-protocol spoken inside a negotiated `sync:` channel.
///
/// Every frame is a 4-byte ASCII id followed by a little-endian u32.
/// Obtained from [`Transport::start_sync`], never built directly.
pub struct SyncTransport {
    transport: Transport,
}

impl SyncTransport {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Start a LIST, RECV or SEND request for `payload`
    pub fn send(&mut self, id: &[u8; 4], payload: &str) -> Result<()> {
        debug!("Sending sync command: {} {}", String::from_utf8_lossy(id), payload);
        let bytes = payload.as_bytes();
        let mut buf = BytesMut::with_capacity(8 + bytes.len());
        buf.put_slice(id);
        buf.put_u32_le(frame_length(bytes.len())?);
        buf.put_slice(bytes);
        self.transport.write_all(&buf)?;
        self.transport.flush()
    }

    /// Start a SEND with the `<path>,<mode>` payload
    pub fn send_with_mode(&mut self, id: &[u8; 4], path: &str, mode: u32) -> Result<()> {
        self.send(id, &format!("{},{}", path, mode))
    }

    /// Stream `source` as DATA frames until it is exhausted
    pub fn send_stream<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<u64> {
        let mut buffer = vec![0u8; sync::MAX_DATA_LENGTH];
        let mut sent = 0u64;

        loop {
            let read = match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            let mut frame = BytesMut::with_capacity(8 + read);
            frame.put_slice(sync::DATA);
            frame.put_u32_le(frame_length(read)?);
            frame.put_slice(&buffer[..read]);
            self.transport.write_all(&frame)?;
            sent += read as u64;
        }

        self.transport.flush()?;
        debug!("Sent {} bytes as DATA frames", sent);
        Ok(sent)
    }

    /// Write a bare id/value frame, e.g. DONE with the modification time
    pub fn send_status(&mut self, id: &[u8; 4], value: u32) -> Result<()> {
        let mut frame = BytesMut::with_capacity(8);
        frame.put_slice(id);
        frame.put_u32_le(value);
        self.transport.write_all(&frame)?;
        self.transport.flush()
    }

    pub fn verify_status(&mut self) -> Result<()> {
        let id = self.read_id()?;
        let length = self.read_u32()?;

        match &id {
            sync::OKAY => Ok(()),
            sync::FAIL => Err(AdbError::Protocol(self.read_text(length)?)),
            _ => Err(unexpected(&id)),
        }
    }

    /// Read one LIST entry; `None` marks the end of the listing
    pub fn read_directory_entry(&mut self) -> Result<Option<RemoteFileRecord>> {
        let id = self.read_id()?;
        let mode = self.read_u32()?;
        let size = self.read_u32()?;
        let mtime = self.read_u32()?;
        let name_length = self.read_u32()?;
        let name = self.read_text(name_length)?;

        match &id {
            sync::DENT => Ok(Some(RemoteFileRecord::new(name, mode, size, mtime))),
            sync::DONE => Ok(None),
            _ => Err(unexpected(&id)),
        }
    }

    /// Copy DATA frames into `sink` until DONE
    pub fn read_chunks_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64> {
        let mut buffer = vec![0u8; sync::MAX_DATA_LENGTH];
        let mut received = 0u64;

        loop {
            let id = self.read_id()?;
            let length = self.read_u32()?;

            match &id {
                sync::DATA => {
                    let length = length as usize;
                    if length > sync::MAX_DATA_LENGTH {
                        return Err(AdbError::MalformedResponse(format!(
                            "DATA frame of {} bytes exceeds {}",
                            length,
                            sync::MAX_DATA_LENGTH
                        )));
                    }
                    self.transport.read_exact(&mut buffer[..length])?;
                    sink.write_all(&buffer[..length])?;
                    received += length as u64;
                }
                sync::DONE => break,
                sync::FAIL => return Err(AdbError::Protocol(self.read_text(length)?)),
                _ => return Err(unexpected(&id)),
            }
        }

        sink.flush()?;
        debug!("Received {} bytes", received);
        Ok(received)
    }

    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }

    fn read_id(&mut self) -> Result<[u8; 4]> {
        let mut id = [0u8; 4];
        self.transport.read_exact(&mut id)?;
        Ok(id)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.transport.read_exact(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a daemon-sized string, refusing lengths no real frame carries
    fn read_text(&mut self, length: u32) -> Result<String> {
        let length = length as usize;
        if length > sync::MAX_DATA_LENGTH {
            return Err(AdbError::MalformedResponse(format!(
                "string of {} bytes exceeds {}",
                length,
                sync::MAX_DATA_LENGTH
            )));
        }
        let mut bytes = vec![0u8; length];
        self.transport.read_exact(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn frame_length(length: usize) -> Result<u32> {
    u32::try_from(length)
        .map_err(|_| AdbError::InvalidRequest(format!("payload of {} bytes is too large", length)))
}

fn unexpected(id: &[u8; 4]) -> AdbError {
    AdbError::MalformedResponse(format!(
        "unexpected sync frame {:?}",
        String::from_utf8_lossy(id)
    ))
}
