use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;
use std::io::{self, Write};

/// Runs a command through `shell:` or, with `raw`, through `exec:`
pub struct ShellCommand {
    raw: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ShellArgs {
    /// Command to run on the device
    pub command: String,

    /// Arguments, quoted for the device shell
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl ShellCommand {
    pub fn new() -> Self {
        Self { raw: false }
    }

    pub fn exec() -> Self {
        Self { raw: true }
    }
}

#[async_trait]
impl SubCommand for ShellCommand {
    type Args = ShellArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let device = ctx.device();
        let raw = self.raw;

        blocking(move || {
            let argv: Vec<&str> = args.args.iter().map(String::as_str).collect();
            let stdout = io::stdout();
            let mut out = stdout.lock();

            if raw {
                let mut stream = device.execute(&args.command, &argv)?;
                io::copy(&mut stream, &mut out)?;
            } else {
                device.execute_shell_to(&mut out, &args.command, &argv)?;
            }
            out.flush()?;
            Ok(())
        })
        .await
    }
}
