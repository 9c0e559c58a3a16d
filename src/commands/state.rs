use crate::cli::OutputType;
use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::json;

pub struct StateCommand;

impl StateCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for StateCommand {
    type Args = ();

    async fn run(&self, ctx: &CommandContext, _args: Self::Args) -> Result<()> {
        let device = ctx.device();
        let serial = device.serial().map(str::to_string);
        let state = blocking(move || device.state()).await?;

        match ctx.output_format {
            OutputType::Json => ctx.formatter().json(&json!({
                "serial": serial,
                "state": state,
            })),
            _ => {
                println!("{}", state);
                Ok(())
            }
        }
    }
}
