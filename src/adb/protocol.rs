use std::fmt;

/// Requests understood by the host daemon itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    Version,
    Devices,
    TrackDevices,
    Connect { host: String, port: u16 },
    Disconnect { host: String, port: u16 },
    /// Scope the connection to one device, or to the only attached one
    Transport(Option<String>),
    GetState(Option<String>),
}

/// Requests sent after the device channel has been negotiated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceRequest {
    Shell(String),
    Exec(String),
    Tcpip(u16),
    Sync,
}

impl fmt::Display for HostRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version => write!(f, "host:version"),
            Self::Devices => write!(f, "host:devices"),
            Self::TrackDevices => write!(f, "host:track-devices"),
            Self::Connect { host, port } => write!(f, "host:connect:{}:{}", host, port),
            Self::Disconnect { host, port } => write!(f, "host:disconnect:{}:{}", host, port),
            Self::Transport(None) => write!(f, "host:transport-any"),
            Self::Transport(Some(serial)) => write!(f, "host:transport:{}", serial),
            Self::GetState(None) => write!(f, "host:get-state"),
            Self::GetState(Some(serial)) => write!(f, "host-serial:{}:get-state", serial),
        }
    }
}

impl fmt::Display for DeviceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell(cmdline) => write!(f, "shell:{}", cmdline),
            Self::Exec(cmdline) => write!(f, "exec:{}", cmdline),
            Self::Tcpip(port) => write!(f, "tcpip:{}", port),
            Self::Sync => write!(f, "sync:"),
        }
    }
}

/// Sync protocol frame ids
pub mod sync {
    pub const LIST: &[u8; 4] = b"LIST";
    pub const DENT: &[u8; 4] = b"DENT";
    pub const SEND: &[u8; 4] = b"SEND";
    pub const RECV: &[u8; 4] = b"RECV";
    pub const DATA: &[u8; 4] = b"DATA";
    pub const DONE: &[u8; 4] = b"DONE";
    pub const OKAY: &[u8; 4] = b"OKAY";
    pub const FAIL: &[u8; 4] = b"FAIL";

    /// Largest payload the daemon accepts in one DATA frame
    pub const MAX_DATA_LENGTH: usize = 64 * 1024;
}
