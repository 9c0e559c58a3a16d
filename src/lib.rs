pub mod adb;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod output;
pub mod progress;
pub mod utils;

pub use adb::{
    Connection, RemoteFileRecord, SyncTransport, TcpTransportFactory, Transport, TransportFactory,
    TransportStream,
};
pub use device::{Device, DeviceEvent, DeviceListener, DeviceState, DeviceWatcher};
pub use error::{AdbError, Result};

#[cfg(test)]
pub mod testing;
