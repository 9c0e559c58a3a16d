pub mod connection;
pub mod protocol;
pub mod remote_file;
pub mod sync;
pub mod transport;

pub use connection::{Connection, TcpTransportFactory, TransportFactory};
pub use protocol::{DeviceRequest, HostRequest};
pub use remote_file::RemoteFileRecord;
pub use sync::SyncTransport;
pub use transport::{Socket, Transport, TransportCloser, TransportStream};

// Re-export commonly used types
pub use crate::error::Result;

#[cfg(test)]
mod transport_test;
