use crate::cli::OutputType;
use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::device::DeviceState;
use crate::error::Result;
use crate::output::DeviceRow;
use async_trait::async_trait;
use log::warn;

pub struct DevicesCommand;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct DevicesArgs {
    /// Only list devices that are ready for commands
    #[clap(short, long)]
    pub available: bool,
}

impl DevicesCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for DevicesCommand {
    type Args = DevicesArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let connection = ctx.connection.clone();
        let rows = blocking(move || {
            let rows = connection
                .devices()?
                .into_iter()
                .filter_map(|device| {
                    let serial = device.serial()?.to_string();
                    let state = device.state().unwrap_or_else(|e| {
                        warn!("Could not query state of {}: {}", serial, e);
                        DeviceState::Unknown
                    });
                    Some(DeviceRow { serial, state })
                })
                .collect::<Vec<_>>();
            Ok(rows)
        })
        .await?;

        let rows: Vec<DeviceRow> = rows
            .into_iter()
            .filter(|row| !args.available || row.state.is_available())
            .collect();

        let formatter = ctx.formatter();
        match ctx.output_format {
            OutputType::Table => formatter.table(&rows),
            OutputType::Json => formatter.json(&rows),
            OutputType::Plain => formatter.plain(&rows),
        }
    }
}
