use crate::core::context::CommandContext;
use crate::error::{AdbError, Result};
use async_trait::async_trait;
use std::io;

/// Base trait for all subcommands
#[async_trait]
pub trait SubCommand {
    type Args;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()>;
}

/// Run blocking protocol work off the async executor
pub async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AdbError::Io(io::Error::new(io::ErrorKind::Other, e)))?
}

/// Expand `~` in a local path argument
pub fn expand_local_path(path: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(shellexpand::tilde(path).into_owned())
}

pub mod runner;

// Individual command modules
pub mod devices;
pub mod ls;
pub mod pull;
pub mod push;
pub mod server;
pub mod shell;
pub mod state;
pub mod track;
pub mod version;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_local_path_leaves_plain_paths() {
        assert_eq!(expand_local_path("out/a.txt"), std::path::PathBuf::from("out/a.txt"));
    }

    #[test]
    fn test_expand_local_path_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_local_path("~/a.txt"), home.join("a.txt"));
        }
    }

    #[tokio::test]
    async fn test_blocking_passes_result_through() {
        assert_eq!(blocking(|| Ok(42)).await.unwrap(), 42);
        let failed: Result<()> = blocking(|| Err(AdbError::Protocol("no".into()))).await;
        assert!(matches!(failed, Err(AdbError::Protocol(_))));
    }
}
