pub mod client;
pub mod state;
pub mod watcher;

pub use client::{Device, DEFAULT_MODE, DEFAULT_TCPIP_PORT};
pub use state::DeviceState;
pub use watcher::{DeviceEvent, DeviceListener, DeviceWatcher};


/// Parse a device list body (`serial\tstate` per line).
///
/// Trailing empty fields are ignored and lines left with fewer than two
/// fields are dropped; a partial listing is still useful.
pub fn parse_device_list(body: &str) -> Vec<(String, DeviceState)> {
    body.lines()
        .filter_map(|line| {
            let mut fields: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
            while fields.last().is_some_and(|field| field.is_empty()) {
                fields.pop();
            }
            match fields.as_slice() {
                [serial, state, ..] => Some((serial.to_string(), DeviceState::from_token(state))),
                _ => None,
            }
        })
        .collect()
}
