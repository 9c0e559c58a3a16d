use crate::adb::connection::TransportFactory;
use crate::adb::transport::{Transport, TransportCloser};
use crate::device::client::Device;
use crate::device::parse_device_list;
use crate::device::state::DeviceState;
use crate::error::{AdbError, Result};
use log::*;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Change in the set of attached devices
#[derive(Debug)]
pub enum DeviceEvent {
    Connected {
        device: Device,
        state: DeviceState,
    },
    Disconnected {
        device: Device,
    },
    StateChanged {
        device: Device,
        old: DeviceState,
        new: DeviceState,
    },
    /// Last event of a watcher. `error` is set when the stream failed rather
    /// than ended.
    Closed {
        error: Option<AdbError>,
    },
}

/// Receives watcher events on the watcher's own thread
pub trait DeviceListener: Send {
    fn on_event(&mut self, event: DeviceEvent);
}

impl<F> DeviceListener for F
where
    F: FnMut(DeviceEvent) + Send,
{
    fn on_event(&mut self, event: DeviceEvent) {
        self(event)
    }
}

/// Serial to state, in the order the daemon listed them
#[derive(Debug, Default)]
struct DeviceSnapshot {
    entries: Vec<(String, DeviceState)>,
}

impl DeviceSnapshot {
    fn parse(body: &str) -> Self {
        Self {
            entries: parse_device_list(body),
        }
    }

    fn get(&self, serial: &str) -> Option<DeviceState> {
        self.entries
            .iter()
            .find(|(known, _)| known == serial)
            .map(|(_, state)| *state)
    }

    /// Events that turn `self` into `next`
    fn diff(&self, next: &DeviceSnapshot, factory: &Arc<dyn TransportFactory>) -> Vec<DeviceEvent> {
        let device = |serial: &str| Device::new(Some(serial.to_string()), Arc::clone(factory));
        let mut events = Vec::new();

        for (serial, state) in &next.entries {
            match self.get(serial) {
                None => events.push(DeviceEvent::Connected {
                    device: device(serial),
                    state: *state,
                }),
                Some(old) if old != *state => events.push(DeviceEvent::StateChanged {
                    device: device(serial),
                    old,
                    new: *state,
                }),
                Some(_) => {}
            }
        }

        for (serial, _) in &self.entries {
            if next.get(serial).is_none() {
                events.push(DeviceEvent::Disconnected {
                    device: device(serial),
                });
            }
        }

        events
    }
}

/// Background reader of a `host:track-devices` stream.
///
/// Stopping closes the stream; the blocked read fails and the thread exits
/// after delivering [`DeviceEvent::Closed`]. Dropping the watcher stops it.
pub struct DeviceWatcher {
    closer: TransportCloser,
    handle: Option<JoinHandle<()>>,
}

impl DeviceWatcher {
    pub(crate) fn spawn(
        transport: Transport,
        listener: Box<dyn DeviceListener>,
        factory: Arc<dyn TransportFactory>,
    ) -> Result<Self> {
        let closer = transport.closer()?;
        let handle = thread::Builder::new()
            .name("adb-device-watcher".to_string())
            .spawn(move || watch(transport, listener, factory))?;

        Ok(Self {
            closer,
            handle: Some(handle),
        })
    }

    pub fn stop(&self) -> Result<()> {
        info!("Stopping device watcher");
        self.closer.close()
    }

    /// Wait for the watcher thread to finish
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Device watcher thread panicked");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for DeviceWatcher {
    fn drop(&mut self) {
        if let Err(e) = self.closer.close() {
            debug!("Ignoring error while stopping device watcher: {}", e);
        }
    }
}

fn watch(
    mut transport: Transport,
    mut listener: Box<dyn DeviceListener>,
    factory: Arc<dyn TransportFactory>,
) {
    debug!("Device watcher started");
    let mut previous = DeviceSnapshot::default();

    let error = loop {
        match transport.read_frame() {
            Ok(Some(body)) => {
                let next = DeviceSnapshot::parse(&body);
                debug!("Device snapshot: {:?}", next.entries);
                for event in previous.diff(&next, &factory) {
                    debug!("Device event: {:?}", event);
                    listener.on_event(event);
                }
                previous = next;
            }
            Ok(None) => break None,
            Err(e) => {
                debug!("Device tracking stream failed: {}", e);
                break Some(e);
            }
        }
    };

    if let Err(e) = transport.close() {
        debug!("Ignoring error while closing tracking stream: {}", e);
    }
    listener.on_event(DeviceEvent::Closed { error });
    debug!("Device watcher finished");
}
