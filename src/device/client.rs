use crate::adb::connection::TransportFactory;
use crate::adb::protocol::{sync, DeviceRequest, HostRequest};
use crate::adb::remote_file::RemoteFileRecord;
use crate::adb::sync::SyncTransport;
use crate::adb::transport::{Transport, TransportStream};
use crate::device::state::DeviceState;
use crate::error::Result;
use crate::utils::{build_command_line, epoch_seconds};
use log::*;
use std::fmt;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Mode given to files pushed from the local filesystem
pub const DEFAULT_MODE: u32 = 0o664;
pub const DEFAULT_TCPIP_PORT: u16 = 5555;

/// Handle to one device attached to the daemon.
///
/// A handle caches nothing: every operation negotiates a fresh channel, so
/// state always comes from the daemon. Equality and hashing use the serial
/// only; the "any device" handle has no serial.
#[derive(Clone)]
pub struct Device {
    serial: Option<String>,
    factory: Arc<dyn TransportFactory>,
}

impl Device {
    pub(crate) fn new(serial: Option<String>, factory: Arc<dyn TransportFactory>) -> Self {
        Self { serial, factory }
    }

    /// `None` for the handle that targets the single attached device
    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Ask the daemon for this device's current state
    pub fn state(&self) -> Result<DeviceState> {
        let mut transport = self.factory.create_transport(None)?;
        let request = HostRequest::GetState(self.serial.clone());
        transport.send(&request.to_string())?;
        transport.verify_response()?;
        let token = transport.read_string()?;
        transport.close()?;

        debug!("{} reported state {:?}", self, token);
        Ok(DeviceState::from_token(&token))
    }

    /// Run a shell command and return its combined stdout/stderr.
    ///
    /// The returned stream owns the channel; drain or close it to release
    /// the socket.
    pub fn execute_shell(&self, command: &str, args: &[&str]) -> Result<TransportStream> {
        let mut transport = self.negotiate(None)?;
        let request = DeviceRequest::Shell(build_command_line(command, args));
        send(&mut transport, &request.to_string())?;
        Ok(transport.into_stream())
    }

    /// Run a shell command and copy all of its output into `sink`
    pub fn execute_shell_to<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        command: &str,
        args: &[&str],
    ) -> Result<u64> {
        let mut transport = self.negotiate(None)?;
        let request = DeviceRequest::Shell(build_command_line(command, args));
        send(&mut transport, &request.to_string())?;
        let copied = transport.read_response_to(sink)?;
        transport.close()?;
        Ok(copied)
    }

    /// Run a command through `exec:`, which passes binary output untouched
    pub fn execute(&self, command: &str, args: &[&str]) -> Result<TransportStream> {
        self.exec(None, command, args)
    }

    /// [`Device::execute`] with a read timeout on the channel. Zero means none.
    pub fn execute_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
        args: &[&str],
    ) -> Result<TransportStream> {
        self.exec(Some(timeout).filter(|timeout| !timeout.is_zero()), command, args)
    }

    /// Restart adbd on the device listening on TCP port 5555
    pub fn enable_adb_over_tcp(&self) -> Result<()> {
        self.enable_adb_over_tcp_on(DEFAULT_TCPIP_PORT)
    }

    pub fn enable_adb_over_tcp_on(&self, port: u16) -> Result<()> {
        let mut transport = self.negotiate(None)?;
        send(&mut transport, &DeviceRequest::Tcpip(port).to_string())?;
        transport.close()?;
        info!("{} switched to TCP on port {}", self, port);
        Ok(())
    }

    /// List a remote directory. A missing path yields an empty listing.
    pub fn list(&self, remote_path: &str) -> Result<Vec<RemoteFileRecord>> {
        let mut channel = self.start_sync()?;
        channel.send(sync::LIST, remote_path)?;

        let mut entries = Vec::new();
        while let Some(entry) = channel.read_directory_entry()? {
            entries.push(entry);
        }
        channel.close()?;

        debug!("Listed {} entries in {}", entries.len(), remote_path);
        Ok(entries)
    }

    /// Upload `source` to `remote_path`. `last_modified` is in epoch seconds.
    pub fn push<R: Read + ?Sized>(
        &self,
        source: &mut R,
        last_modified: u32,
        mode: u32,
        remote_path: &str,
    ) -> Result<u64> {
        info!("Pushing to {} on {}", remote_path, self);
        let mut channel = self.start_sync()?;
        channel.send_with_mode(sync::SEND, remote_path, mode)?;
        let sent = channel.send_stream(source)?;
        channel.send_status(sync::DONE, last_modified)?;
        channel.verify_status()?;
        channel.close()?;

        info!("Successfully pushed {} bytes to {}", sent, remote_path);
        Ok(sent)
    }

    /// Upload a local file with [`DEFAULT_MODE`] and its modification time
    pub fn push_file(&self, local: &Path, remote_path: &str) -> Result<u64> {
        let metadata = fs::metadata(local)?;
        let last_modified = metadata.modified().map(epoch_seconds).unwrap_or(0);

        let mut file = File::open(local)?;
        self.push(&mut file, last_modified, DEFAULT_MODE, remote_path)
    }

    /// Download `remote_path` into `destination`
    pub fn pull<W: Write + ?Sized>(&self, remote_path: &str, destination: &mut W) -> Result<u64> {
        info!("Pulling {} from {}", remote_path, self);
        let mut channel = self.start_sync()?;
        channel.send(sync::RECV, remote_path)?;
        let received = channel.read_chunks_to(destination)?;
        channel.close()?;

        info!("Successfully pulled {} bytes from {}", received, remote_path);
        Ok(received)
    }

    pub fn pull_file(&self, remote_path: &str, local: &Path) -> Result<u64> {
        let mut file = File::create(local)?;
        self.pull(remote_path, &mut file)
    }

    /// Open a transport scoped to this device. The caller owns the result.
    fn negotiate(&self, timeout: Option<Duration>) -> Result<Transport> {
        let mut transport = self.factory.create_transport(timeout)?;
        let request = HostRequest::Transport(self.serial.clone());
        if let Err(e) = send(&mut transport, &request.to_string()) {
            debug!("Negotiation with {} failed: {}", self, e);
            if let Err(close_error) = transport.close() {
                debug!("Ignoring error while closing transport: {}", close_error);
            }
            return Err(e);
        }
        Ok(transport)
    }

    fn exec(&self, timeout: Option<Duration>, command: &str, args: &[&str]) -> Result<TransportStream> {
        let mut transport = self.negotiate(timeout)?;
        let request = DeviceRequest::Exec(build_command_line(command, args));
        send(&mut transport, &request.to_string())?;
        Ok(transport.into_stream())
    }

    fn start_sync(&self) -> Result<SyncTransport> {
        let mut transport = self.negotiate(None)?;
        send(&mut transport, &DeviceRequest::Sync.to_string())?;
        Ok(transport.start_sync())
    }
}

fn send(transport: &mut Transport, command: &str) -> Result<()> {
    transport.send(command)?;
    transport.verify_response()
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serial.hash(state);
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device").field("serial", &self.serial).finish()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.serial {
            Some(serial) => write!(f, "Android device {}", serial),
            None => write!(f, "any device"),
        }
    }
}
