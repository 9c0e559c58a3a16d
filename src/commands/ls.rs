use crate::cli::OutputType;
use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;

pub struct LsCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct LsArgs {
    /// Remote directory to list
    #[arg(default_value = "/sdcard")]
    pub path: String,

    /// Include the `.` and `..` entries
    #[clap(short, long)]
    pub all: bool,
}

impl LsCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for LsCommand {
    type Args = LsArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let device = ctx.device();
        let path = args.path.clone();
        let mut entries = blocking(move || device.list(&path)).await?;

        if !args.all {
            entries.retain(|entry| entry.path() != "." && entry.path() != "..");
        }
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        let formatter = ctx.formatter();
        match ctx.output_format {
            OutputType::Table => formatter.table(&entries),
            OutputType::Json => formatter.json(&entries),
            OutputType::Plain => formatter.plain(&entries),
        }
    }
}
