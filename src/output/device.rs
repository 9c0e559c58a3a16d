use crate::device::{DeviceEvent, DeviceState};
use crate::output::{PlainFormat, TableFormat};
use colored::*;
use serde::Serialize;

/// One line of the device listing
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRow {
    pub serial: String,
    pub state: DeviceState,
}

fn colored_state(state: DeviceState) -> String {
    match state {
        DeviceState::Device => state.as_str().green().to_string(),
        DeviceState::Offline | DeviceState::Unauthorized => state.as_str().red().to_string(),
        DeviceState::Unknown => state.as_str().dimmed().to_string(),
        _ => state.as_str().yellow().to_string(),
    }
}

impl TableFormat for DeviceRow {
    fn headers() -> Vec<&'static str> {
        vec!["SERIAL", "STATE"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.serial.clone(), colored_state(self.state)]
    }
}

impl PlainFormat for DeviceRow {
    fn plain(&self) -> String {
        format!("{}\t{}", self.serial, self.state)
    }
}

/// Printable form of a watcher event
#[derive(Debug, Clone, Serialize)]
pub struct DeviceEventRow {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<DeviceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DeviceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&DeviceEvent> for DeviceEventRow {
    fn from(event: &DeviceEvent) -> Self {
        let serial = |device: &crate::device::Device| device.serial().map(str::to_string);
        let mut row = DeviceEventRow {
            event: "",
            serial: None,
            old: None,
            state: None,
            error: None,
        };
        match event {
            DeviceEvent::Connected { device, state } => {
                row.event = "connected";
                row.serial = serial(device);
                row.state = Some(*state);
            }
            DeviceEvent::Disconnected { device } => {
                row.event = "disconnected";
                row.serial = serial(device);
            }
            DeviceEvent::StateChanged { device, old, new } => {
                row.event = "changed";
                row.serial = serial(device);
                row.old = Some(*old);
                row.state = Some(*new);
            }
            DeviceEvent::Closed { error } => {
                row.event = "closed";
                row.error = error.as_ref().map(ToString::to_string);
            }
        }
        row
    }
}

impl PlainFormat for DeviceEventRow {
    fn plain(&self) -> String {
        let serial = self.serial.as_deref().unwrap_or("-");
        match (self.event, self.old, self.state, &self.error) {
            ("changed", Some(old), Some(new), _) => {
                format!("changed\t{}\t{} -> {}", serial, old, new)
            }
            (event, _, Some(state), _) => format!("{}\t{}\t{}", event, serial, state),
            (event, _, _, Some(error)) => format!("{}\t{}", event, error),
            (event, _, _, None) if self.serial.is_some() => format!("{}\t{}", event, serial),
            (event, _, _, None) => event.to_string(),
        }
    }
}

impl DeviceEventRow {
    /// Colored single-line rendering for the terminal
    pub fn pretty(&self) -> String {
        let line = self.plain();
        match self.event {
            "connected" => line.green().to_string(),
            "disconnected" => line.red().to_string(),
            "changed" => line.yellow().to_string(),
            _ if self.error.is_some() => line.bright_red().to_string(),
            _ => line.dimmed().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::Connection;
    use crate::error::AdbError;

    #[test]
    fn test_device_row_plain() {
        let row = DeviceRow {
            serial: "emulator-5554".to_string(),
            state: DeviceState::Device,
        };
        assert_eq!(row.plain(), "emulator-5554\tdevice");
        assert_eq!(DeviceRow::headers(), vec!["SERIAL", "STATE"]);
    }

    #[test]
    fn test_event_rows() {
        let connection = Connection::new();
        let device = connection.device("ZX1G");

        let connected = DeviceEventRow::from(&DeviceEvent::Connected {
            device: device.clone(),
            state: DeviceState::Device,
        });
        assert_eq!(connected.plain(), "connected\tZX1G\tdevice");

        let changed = DeviceEventRow::from(&DeviceEvent::StateChanged {
            device: device.clone(),
            old: DeviceState::Unauthorized,
            new: DeviceState::Device,
        });
        assert_eq!(changed.plain(), "changed\tZX1G\tunauthorized -> device");

        let gone = DeviceEventRow::from(&DeviceEvent::Disconnected { device });
        assert_eq!(gone.plain(), "disconnected\tZX1G");

        let closed = DeviceEventRow::from(&DeviceEvent::Closed { error: None });
        assert_eq!(closed.plain(), "closed");

        let failed = DeviceEventRow::from(&DeviceEvent::Closed {
            error: Some(AdbError::Protocol("boom".into())),
        });
        assert_eq!(failed.plain(), "closed\tboom");
    }

    #[test]
    fn test_event_json_skips_empty_fields() {
        let row = DeviceEventRow::from(&DeviceEvent::Closed { error: None });
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "closed" }));
    }
}
