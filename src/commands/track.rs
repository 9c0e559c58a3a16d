use crate::cli::OutputType;
use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::device::DeviceEvent;
use crate::error::Result;
use crate::output::{DeviceEventRow, PlainFormat};
use async_trait::async_trait;
use log::{debug, info};
use tokio::signal;
use tokio::sync::mpsc;

pub struct TrackCommand;

impl TrackCommand {
    pub fn new() -> Self {
        Self
    }
}

fn print_event(ctx: &CommandContext, event: &DeviceEvent) -> Result<()> {
    let row = DeviceEventRow::from(event);
    match ctx.output_format {
        OutputType::Json => {
            println!("{}", serde_json::to_string(&row)?);
            Ok(())
        }
        OutputType::Plain => {
            println!("{}", row.plain());
            Ok(())
        }
        OutputType::Table => {
            println!("{}", row.pretty());
            Ok(())
        }
    }
}

#[async_trait]
impl SubCommand for TrackCommand {
    type Args = ();

    async fn run(&self, ctx: &CommandContext, _args: Self::Args) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ctx.connection.clone();
        let watcher = blocking(move || {
            connection.create_device_watcher(move |event: DeviceEvent| {
                // The receiver is gone only once we stopped listening
                let _ = tx.send(event);
            })
        })
        .await?;
        info!("Tracking devices, press Ctrl-C to stop");

        let mut stopping = false;
        let error = loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(DeviceEvent::Closed { error }) => {
                        if let Some(e) = &error {
                            debug!("Tracking stream ended with error: {}", e);
                        }
                        break error.filter(|_| !stopping);
                    }
                    Some(event) => print_event(ctx, &event)?,
                    None => break None,
                },
                _ = signal::ctrl_c(), if !stopping => {
                    debug!("Interrupted, stopping watcher");
                    stopping = true;
                    watcher.stop()?;
                }
            }
        };

        blocking(move || {
            watcher.join();
            Ok(())
        })
        .await?;

        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
