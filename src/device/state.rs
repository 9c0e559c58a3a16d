use serde::{Deserialize, Serialize};
use std::fmt;

/// Device state as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Unknown,
    Offline,
    Device,
    Recovery,
    BootLoader,
    Unauthorized,
    Authorizing,
    Sideload,
    Connecting,
}

impl DeviceState {
    /// Map a daemon token to a state. Tokens this client does not know map to
    /// `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "device" => DeviceState::Device,
            "offline" => DeviceState::Offline,
            "bootloader" => DeviceState::BootLoader,
            "recovery" => DeviceState::Recovery,
            "unauthorized" => DeviceState::Unauthorized,
            "authorizing" => DeviceState::Authorizing,
            "connecting" => DeviceState::Connecting,
            "sideload" => DeviceState::Sideload,
            _ => DeviceState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Unknown => "unknown",
            DeviceState::Offline => "offline",
            DeviceState::Device => "device",
            DeviceState::Recovery => "recovery",
            DeviceState::BootLoader => "bootloader",
            DeviceState::Unauthorized => "unauthorized",
            DeviceState::Authorizing => "authorizing",
            DeviceState::Sideload => "sideload",
            DeviceState::Connecting => "connecting",
        }
    }

    /// Ready for shell and sync requests
    pub fn is_available(&self) -> bool {
        *self == DeviceState::Device
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
