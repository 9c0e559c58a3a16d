use crate::adb::connection::TransportFactory;
use crate::adb::transport::{Socket, Transport};
use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory socket that replays canned daemon output and records writes
pub struct MockSocket {
    input: Cursor<Vec<u8>>,
    session: MockSession,
}

/// What the client did with one mock socket
#[derive(Clone, Default)]
pub struct MockSession {
    written: Arc<Mutex<Vec<u8>>>,
    shutdown: Arc<AtomicBool>,
}

impl MockSocket {
    pub fn new(input: Vec<u8>) -> (Self, MockSession) {
        let session = MockSession::default();
        let socket = Self {
            input: Cursor::new(input),
            session: session.clone(),
        };
        (socket, session)
    }

    pub fn transport(input: Vec<u8>) -> (Transport, MockSession) {
        let (socket, session) = Self::new(input);
        (Transport::new(Box::new(socket)), session)
    }
}

impl MockSession {
    pub fn written(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    pub fn written_string(&self) -> String {
        String::from_utf8_lossy(&self.written()).into_owned()
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Read for MockSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.session.is_closed() {
            return Ok(0);
        }
        self.input.read(buf)
    }
}

impl Write for MockSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.session.is_closed() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "socket shut down"));
        }
        self.session.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Socket for MockSocket {
    fn shutdown(&self) -> io::Result<()> {
        self.session.shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn try_clone_socket(&self) -> io::Result<Box<dyn Socket>> {
        Ok(Box::new(MockSocket {
            input: Cursor::new(Vec::new()),
            session: self.session.clone(),
        }))
    }
}

/// Factory handing out one scripted socket per transport, in order.
///
/// Runs out with `ConnectionRefused`, like a daemon that is not listening.
#[derive(Default)]
pub struct ScriptedFactory {
    replies: Mutex<VecDeque<Vec<u8>>>,
    sessions: Mutex<Vec<MockSession>>,
    timeouts: Mutex<Vec<Option<Duration>>>,
}

impl ScriptedFactory {
    pub fn new(replies: Vec<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    pub fn session(&self, index: usize) -> MockSession {
        self.sessions.lock().unwrap()[index].clone()
    }

    pub fn transports_created(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.timeouts.lock().unwrap().clone()
    }
}

impl TransportFactory for ScriptedFactory {
    fn create_transport(&self, timeout: Option<Duration>) -> Result<Transport> {
        let reply = self.replies.lock().unwrap().pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::ConnectionRefused, "no scripted daemon reply")
        })?;
        let (transport, session) = MockSocket::transport(reply);
        self.sessions.lock().unwrap().push(session);
        self.timeouts.lock().unwrap().push(timeout);
        Ok(transport)
    }
}
