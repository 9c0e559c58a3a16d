use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::device::DEFAULT_TCPIP_PORT;
use crate::error::Result;
use crate::utils::parse_address;
use async_trait::async_trait;
use colored::*;

/// Connects or disconnects a TCP device through the daemon
pub struct ConnectCommand {
    disconnect: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ConnectArgs {
    /// Device address, `host[:port]` (port defaults to 5555)
    pub address: String,
}

impl ConnectCommand {
    pub fn new() -> Self {
        Self { disconnect: false }
    }

    pub fn disconnect() -> Self {
        Self { disconnect: true }
    }
}

#[async_trait]
impl SubCommand for ConnectCommand {
    type Args = ConnectArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let (host, port) = parse_address(&args.address)?;
        let connection = ctx.connection.clone();
        let disconnect = self.disconnect;

        let target = host.clone();
        blocking(move || {
            if disconnect {
                connection.disconnect_from_tcp_device(&target, port)
            } else {
                connection.connect_to_tcp_device(&target, port)
            }
        })
        .await?;

        let verb = if disconnect { "Disconnected from" } else { "Connected to" };
        println!("{} {} {}:{}", "✓".green(), verb, host, port);
        Ok(())
    }
}

pub struct TcpipCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct TcpipArgs {
    /// Port adbd should listen on
    #[arg(default_value_t = DEFAULT_TCPIP_PORT)]
    pub port: u16,
}

impl TcpipCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for TcpipCommand {
    type Args = TcpipArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let device = ctx.device();
        let port = args.port;
        blocking(move || device.enable_adb_over_tcp_on(port)).await?;

        println!("{} Restarting in TCP mode on port {}", "✓".green(), port);
        Ok(())
    }
}
