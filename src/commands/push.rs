use crate::commands::{blocking, expand_local_path, SubCommand};
use crate::core::context::CommandContext;
use crate::device::DEFAULT_MODE;
use crate::error::{AdbError, Result};
use crate::output::format_size;
use crate::progress::{ProgressFactory, ProgressReader};
use crate::utils::epoch_seconds;
use async_trait::async_trait;
use log::debug;
use std::fs::{self, File};
use std::path::Path;

pub struct PushCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct PushArgs {
    /// Local file to push
    pub src: String,

    /// Remote destination path on device
    pub dst: String,

    /// Mode of the remote file, in octal
    #[clap(short, long, value_parser = parse_mode)]
    pub mode: Option<u32>,
}

fn parse_mode(value: &str) -> std::result::Result<u32, String> {
    u32::from_str_radix(value.trim_start_matches("0o"), 8)
        .map_err(|_| format!("{} is not an octal file mode", value))
}

/// A destination ending in `/` is a directory; the local file name is kept
fn remote_target(local: &Path, dst: &str) -> Result<String> {
    if !dst.ends_with('/') {
        return Ok(dst.to_string());
    }
    let name = local
        .file_name()
        .ok_or_else(|| AdbError::InvalidRequest(format!("{} has no file name", local.display())))?;
    Ok(format!("{}{}", dst, name.to_string_lossy()))
}

impl PushCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for PushCommand {
    type Args = PushArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let device = ctx.device();
        let local = expand_local_path(&args.src);
        let remote = remote_target(&local, &args.dst)?;
        let mode = args.mode.unwrap_or(DEFAULT_MODE);
        let show_progress = ctx.should_show_progress();
        debug!("Pushing {} to {} (mode {:o})", local.display(), remote, mode);

        let target = remote.clone();
        let sent = blocking(move || {
            let metadata = fs::metadata(&local)?;
            if metadata.is_dir() {
                return Err(AdbError::InvalidRequest(format!(
                    "{} is a directory",
                    local.display()
                )));
            }
            let last_modified = metadata.modified().map(epoch_seconds).unwrap_or(0);

            let progress = ProgressFactory::new(show_progress)
                .file_transfer(&local.display().to_string(), Some(metadata.len()));
            let mut reader = ProgressReader::new(File::open(&local)?, progress.as_ref());
            let sent = device.push(&mut reader, last_modified, mode, &target)?;
            progress.finish();
            Ok(sent)
        })
        .await?;

        ctx.formatter()
            .success(&format!("Pushed {} to {}", format_size(sent), remote))
    }
}
