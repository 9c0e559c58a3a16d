use crate::adb::protocol::HostRequest;
use crate::adb::transport::Transport;
use crate::config::Config;
use crate::device::{parse_device_list, Device, DeviceListener, DeviceWatcher};
use crate::error::{AdbError, Result};
use log::*;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

// Constants
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5037;
const CONNECTED: &str = "connected to";
const ALREADY_CONNECTED: &str = "already connected to";
const DISCONNECTED: &str = "disconnected";

/// Opens a fresh [`Transport`] to the host daemon for each operation
pub trait TransportFactory: Send + Sync {
    /// `timeout` overrides the factory's own read timeout for this transport
    fn create_transport(&self, timeout: Option<Duration>) -> Result<Transport>;
}

/// Connects to the daemon over TCP
#[derive(Debug, Clone)]
pub struct TcpTransportFactory {
    host: String,
    port: u16,
    timeout: Option<Duration>,
}

impl TcpTransportFactory {
    /// A zero `timeout` means no timeout
    pub fn new(host: impl Into<String>, port: u16, timeout: Option<Duration>) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: non_zero(timeout),
        }
    }

    fn establish_connection(&self, timeout: Option<Duration>) -> Result<TcpStream> {
        let server_address = format!(
            "{}:{}",
            if self.host == "localhost" { "127.0.0.1" } else { &self.host },
            self.port
        );
        debug!("Connecting to address: {}", server_address);

        let address = server_address.to_socket_addrs()?.next().ok_or_else(|| {
            AdbError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("could not resolve {}", server_address),
            ))
        })?;
        debug!("Resolved address: {:?}", address);

        let stream = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&address, timeout)?,
            None => TcpStream::connect(address)?,
        };
        stream.set_read_timeout(timeout)?;
        debug!("Connection established");

        Ok(stream)
    }
}

impl TransportFactory for TcpTransportFactory {
    fn create_transport(&self, timeout: Option<Duration>) -> Result<Transport> {
        let stream = self.establish_connection(non_zero(timeout).or(self.timeout))?;
        Ok(Transport::new(Box::new(stream)))
    }
}

fn non_zero(timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|timeout| !timeout.is_zero())
}

/// Host-level client for the ADB daemon.
///
/// Each call opens its own transport, so a `Connection` can be cloned and
/// shared between threads freely.
#[derive(Clone)]
pub struct Connection {
    factory: Arc<dyn TransportFactory>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Connect to the daemon on localhost:5037
    pub fn new() -> Self {
        Self::with_address(DEFAULT_HOST, DEFAULT_PORT)
    }

    pub fn with_address(host: impl Into<String>, port: u16) -> Self {
        Self::with_factory(Arc::new(TcpTransportFactory::new(host, port, None)))
    }

    /// Like [`Connection::with_address`], with a socket connect/read timeout
    pub fn with_timeout(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self::with_factory(Arc::new(TcpTransportFactory::new(host, port, Some(timeout))))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_factory(Arc::new(TcpTransportFactory::new(
            config.host.clone(),
            config.port,
            config.timeout(),
        )))
    }

    pub fn with_factory(factory: Arc<dyn TransportFactory>) -> Self {
        Self { factory }
    }

    pub fn create_transport(&self) -> Result<Transport> {
        self.factory.create_transport(None)
    }

    /// Version string reported by `host:version`
    pub fn host_version(&self) -> Result<String> {
        self.request(&HostRequest::Version, |transport| transport.read_string())
    }

    /// Devices currently attached, in the order the daemon lists them
    pub fn devices(&self) -> Result<Vec<Device>> {
        let body = self.request(&HostRequest::Devices, |transport| transport.read_string())?;
        Ok(self.parse_devices(&body))
    }

    /// Turn a `host:devices` body into device handles, skipping malformed lines
    pub fn parse_devices(&self, body: &str) -> Vec<Device> {
        parse_device_list(body)
            .into_iter()
            .map(|(serial, _state)| self.device(serial))
            .collect()
    }

    pub fn connect_to_tcp_device(&self, host: &str, port: u16) -> Result<()> {
        let request = HostRequest::Connect {
            host: host.to_string(),
            port,
        };
        let reply = self.request(&request, |transport| transport.read_string())?;
        info!("connect {}:{}: {}", host, port, reply.trim());

        if reply.starts_with(CONNECTED) || reply.starts_with(ALREADY_CONNECTED) {
            Ok(())
        } else {
            Err(remote_connection_error(host, port, &reply))
        }
    }

    pub fn disconnect_from_tcp_device(&self, host: &str, port: u16) -> Result<()> {
        let request = HostRequest::Disconnect {
            host: host.to_string(),
            port,
        };
        let reply = self.request(&request, |transport| transport.read_string())?;
        info!("disconnect {}:{}: {}", host, port, reply.trim());

        if reply.starts_with(DISCONNECTED) {
            Ok(())
        } else {
            Err(remote_connection_error(host, port, &reply))
        }
    }

    /// Open the device tracking stream and hand it to a background watcher
    pub fn create_device_watcher<L>(&self, listener: L) -> Result<DeviceWatcher>
    where
        L: DeviceListener + 'static,
    {
        let mut transport = self.create_transport()?;
        transport.send(&HostRequest::TrackDevices.to_string())?;
        transport.verify_response()?;
        DeviceWatcher::spawn(transport, Box::new(listener), Arc::clone(&self.factory))
    }

    /// Handle for whichever single device is attached
    pub fn any_device(&self) -> Device {
        Device::new(None, Arc::clone(&self.factory))
    }

    pub fn device(&self, serial: impl Into<String>) -> Device {
        Device::new(Some(serial.into()), Arc::clone(&self.factory))
    }

    fn request<T>(
        &self,
        request: &HostRequest,
        read: impl FnOnce(&mut Transport) -> Result<T>,
    ) -> Result<T> {
        let mut transport = self.create_transport()?;
        transport.send(&request.to_string())?;
        transport.verify_response()?;
        let value = read(&mut transport)?;
        transport.close()?;
        Ok(value)
    }
}

fn remote_connection_error(host: &str, port: u16, reply: &str) -> AdbError {
    AdbError::RemoteConnection {
        address: format!("{}:{}", host, port),
        message: reply.trim().to_string(),
    }
}
