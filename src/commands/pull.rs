use crate::commands::{blocking, expand_local_path, SubCommand};
use crate::core::context::CommandContext;
use crate::error::Result;
use crate::output::format_size;
use crate::progress::{ProgressFactory, ProgressWriter};
use async_trait::async_trait;
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct PullCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct PullArgs {
    /// Remote file on device
    pub src: String,

    /// Local destination (defaults to the remote file name in the current directory)
    pub dst: Option<String>,
}

/// Resolve the local path, keeping the remote file name when the target is
/// a directory
fn local_target(remote: &str, dst: Option<&str>) -> PathBuf {
    let name = remote.rsplit('/').find(|part| !part.is_empty()).unwrap_or(remote);
    match dst {
        None => PathBuf::from(name),
        Some(dst) => {
            let path = expand_local_path(dst);
            if dst.ends_with('/') || path.is_dir() {
                path.join(name)
            } else {
                path
            }
        }
    }
}

impl PullCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for PullCommand {
    type Args = PullArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let device = ctx.device();
        let local = local_target(&args.src, args.dst.as_deref());
        let show_progress = ctx.should_show_progress();
        debug!("Pulling {} to {}", args.src, local.display());

        let remote = args.src.clone();
        let destination = local.clone();
        let received = blocking(move || {
            // The sync protocol does not announce the size, so only a spinner
            let progress = ProgressFactory::new(show_progress).file_transfer(&remote, None);
            let file = File::create(&destination)?;
            let mut writer = ProgressWriter::new(file, progress.as_ref());
            let result = device.pull(&remote, &mut writer);
            progress.finish();
            drop(writer);

            if result.is_err() {
                remove_partial(&destination);
            }
            result
        })
        .await?;

        ctx.formatter().success(&format!(
            "Pulled {} to {}",
            format_size(received),
            local.display()
        ))
    }
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        debug!("Could not remove partial download {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_target_defaults_to_remote_name() {
        assert_eq!(local_target("/sdcard/DCIM/photo.jpg", None), PathBuf::from("photo.jpg"));
        assert_eq!(local_target("/sdcard/logs/", None), PathBuf::from("logs"));
    }

    #[test]
    fn test_local_target_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().to_str().unwrap();
        assert_eq!(
            local_target("/sdcard/a.txt", Some(dst)),
            dir.path().join("a.txt")
        );
        assert_eq!(
            local_target("/sdcard/a.txt", Some("out/b.txt")),
            PathBuf::from("out/b.txt")
        );
    }
}
