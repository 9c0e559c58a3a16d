use super::transport::Transport;
use crate::error::AdbError;
use crate::testing::{MockSocket, WireScript};
use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn test_send_prefixes_exact_length() {
    let (mut transport, session) = MockSocket::transport(Vec::new());
    transport.send("host:version").unwrap();
    assert_eq!(session.written_string(), "000chost:version");
}

#[test]
fn test_send_zero_pads_length() {
    let (mut transport, session) = MockSocket::transport(Vec::new());
    transport.send("sync:").unwrap();
    transport.send("").unwrap();
    assert_eq!(session.written_string(), "0005sync:0000");
}

#[test]
fn test_send_uses_byte_length() {
    let (mut transport, session) = MockSocket::transport(Vec::new());
    let command = format!("shell:echo {}", "é".repeat(150));
    transport.send(&command).unwrap();

    let written = session.written();
    assert_eq!(&written[..4], format!("{:04x}", command.len()).as_bytes());
    assert_eq!(written.len(), 4 + command.len());
    assert_eq!(command.len(), 311);
}

#[test]
fn test_send_rejects_oversized_command() {
    let (mut transport, session) = MockSocket::transport(Vec::new());
    let result = transport.send(&"x".repeat(0x10000));
    assert!(matches!(result, Err(AdbError::InvalidRequest(_))));
    assert!(session.written().is_empty());
}

#[test]
fn test_verify_response_okay_consumes_four_bytes() {
    let reply = WireScript::new().okay().string("0029").build();
    let (mut transport, _session) = MockSocket::transport(reply);

    transport.verify_response().unwrap();
    assert_eq!(transport.read_string().unwrap(), "0029");
}

#[test]
fn test_verify_response_fail_carries_message() {
    let (mut transport, _session) = MockSocket::transport(b"FAIL0004boom".to_vec());

    match transport.verify_response() {
        Err(AdbError::Protocol(message)) => assert_eq!(message, "boom"),
        other => panic!("expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_verify_response_rejects_unknown_status() {
    let (mut transport, _session) = MockSocket::transport(b"WHAT".to_vec());
    assert!(matches!(
        transport.verify_response(),
        Err(AdbError::MalformedResponse(_))
    ));
}

#[test]
fn test_verify_response_short_read_is_malformed() {
    let (mut transport, _session) = MockSocket::transport(b"OK".to_vec());
    assert!(matches!(
        transport.verify_response(),
        Err(AdbError::MalformedResponse(_))
    ));
}

#[test]
fn test_read_string_accepts_either_case() {
    let (mut transport, _session) = MockSocket::transport(b"000Aabcdefghij000aklmnopqrst".to_vec());
    assert_eq!(transport.read_string().unwrap(), "abcdefghij");
    assert_eq!(transport.read_string().unwrap(), "klmnopqrst");
}

#[test]
fn test_read_string_rejects_bad_prefix() {
    let (mut transport, _session) = MockSocket::transport(b"00g1x".to_vec());
    assert!(matches!(
        transport.read_string(),
        Err(AdbError::MalformedResponse(_))
    ));
}

#[test]
fn test_read_string_truncated_payload_is_io_error() {
    let (mut transport, _session) = MockSocket::transport(b"0010short".to_vec());
    assert!(matches!(transport.read_string(), Err(AdbError::Io(_))));
}

#[test]
fn test_read_frame_clean_end() {
    let reply = WireScript::new().string("a\tdevice\n").build();
    let (mut transport, _session) = MockSocket::transport(reply);

    assert_eq!(transport.read_frame().unwrap().as_deref(), Some("a\tdevice\n"));
    assert!(transport.read_frame().unwrap().is_none());
}

#[test]
fn test_read_response_to_copies_raw_bytes() {
    let (mut transport, _session) = MockSocket::transport(b"line 1\r\n\x00\xffrest".to_vec());
    let mut sink = Vec::new();

    let copied = transport.read_response_to(&mut sink).unwrap();
    assert_eq!(copied, 14);
    assert_eq!(sink, b"line 1\r\n\x00\xffrest");
}

#[test]
fn test_close_is_idempotent() {
    let (mut transport, session) = MockSocket::transport(Vec::new());
    transport.close().unwrap();
    transport.close().unwrap();
    assert!(transport.is_closed());
    assert!(session.is_closed());
}

#[test]
fn test_closed_transport_refuses_io() {
    let (mut transport, _session) = MockSocket::transport(b"OKAY".to_vec());
    transport.close().unwrap();

    assert!(matches!(transport.send("host:version"), Err(AdbError::Io(_))));
    assert!(matches!(transport.read_string(), Err(AdbError::Io(_))));
}

#[test]
fn test_drop_closes_socket() {
    let (transport, session) = MockSocket::transport(Vec::new());
    drop(transport);
    assert!(session.is_closed());
}

#[test]
fn test_stream_closes_when_exhausted() {
    let (transport, session) = MockSocket::transport(b"hello".to_vec());
    let mut stream = transport.into_stream();

    let mut output = String::new();
    stream.read_to_string(&mut output).unwrap();
    assert_eq!(output, "hello");
    assert!(stream.is_closed());
    assert!(session.is_closed());
}

#[test]
fn test_stream_close_cuts_output_short() {
    let (transport, session) = MockSocket::transport(b"0123456789".to_vec());
    let mut stream = transport.into_stream();

    let mut head = [0u8; 4];
    stream.read_exact(&mut head).unwrap();
    assert_eq!(&head, b"0123");

    stream.close().unwrap();
    assert!(session.is_closed());
    let mut rest = Vec::new();
    assert_eq!(stream.read_to_end(&mut rest).unwrap(), 0);
}

#[test]
fn test_close_unblocks_blocked_read() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let (done_tx, done_rx) = mpsc::channel::<()>();

    // Accept and stay silent until the client is done
    let server = thread::spawn(move || {
        let (_socket, _) = listener.accept().unwrap();
        let _ = done_rx.recv();
    });

    let stream = TcpStream::connect(address).unwrap();
    let transport = Transport::new(Box::new(stream));
    let closer = transport.closer().unwrap();

    let reader = thread::spawn(move || {
        let mut transport = transport;
        transport.read_string()
    });

    thread::sleep(Duration::from_millis(100));
    closer.close().unwrap();

    let result = reader.join().unwrap();
    assert!(matches!(result, Err(AdbError::Io(_))));

    done_tx.send(()).unwrap();
    server.join().unwrap();
}
