/// Builder for the bytes a daemon sends back on one connection
#[derive(Debug, Default, Clone)]
pub struct WireScript {
    bytes: Vec<u8>,
}

impl WireScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn okay(mut self) -> Self {
        self.bytes.extend_from_slice(b"OKAY");
        self
    }

    pub fn fail(mut self, message: &str) -> Self {
        self.bytes.extend_from_slice(b"FAIL");
        self.string(message)
    }

    /// Hex length-prefixed payload
    pub fn string(mut self, body: &str) -> Self {
        self.bytes
            .extend_from_slice(format!("{:04x}", body.len()).as_bytes());
        self.bytes.extend_from_slice(body.as_bytes());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Sync frame: id, little-endian length, payload
    pub fn sync_frame(mut self, id: &[u8; 4], payload: &[u8]) -> Self {
        self.bytes.extend_from_slice(id);
        self.bytes
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn sync_status(mut self, id: &[u8; 4], value: u32) -> Self {
        self.bytes.extend_from_slice(id);
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn dent(mut self, name: &str, mode: u32, size: u32, mtime: u32) -> Self {
        self.bytes.extend_from_slice(b"DENT");
        for value in [mode, size, mtime, name.len() as u32] {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
        self.bytes.extend_from_slice(name.as_bytes());
        self
    }

    /// Terminal LIST record: DONE with an all-zero entry
    pub fn list_done(mut self) -> Self {
        self.bytes.extend_from_slice(b"DONE");
        self.bytes.extend_from_slice(&[0u8; 16]);
        self
    }

    /// OKAY for the device channel and OKAY for `sync:`
    pub fn sync_channel(self) -> Self {
        self.okay().okay()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Host-protocol request exactly as the client writes it
pub fn request(command: &str) -> String {
    format!("{:04x}{}", command.len(), command)
}

/// Split a client's sync transcript into frames. DONE carries a value and
/// no payload, so it ends the transcript.
pub fn sync_frames(mut bytes: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
    let mut frames = Vec::new();
    while bytes.len() >= 8 {
        let id: [u8; 4] = bytes[0..4].try_into().unwrap();
        let value: [u8; 4] = bytes[4..8].try_into().unwrap();
        if &id == b"DONE" {
            frames.push((id, value.to_vec()));
            break;
        }
        let length = u32::from_le_bytes(value) as usize;
        frames.push((id, bytes[8..8 + length].to_vec()));
        bytes = &bytes[8 + length..];
    }
    frames
}
