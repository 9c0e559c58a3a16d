pub mod fixtures;
pub mod mocks;

pub use fixtures::{request, sync_frames, WireScript};
pub use mocks::{MockSession, MockSocket, ScriptedFactory};
