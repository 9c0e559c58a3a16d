use crate::cli::{Cli, Commands};
use crate::commands::{
    devices::DevicesCommand,
    ls::LsCommand,
    pull::PullCommand,
    push::PushCommand,
    server::{ConnectCommand, TcpipCommand},
    shell::ShellCommand,
    state::StateCommand,
    track::TrackCommand,
    version::VersionCommand,
    SubCommand,
};
use crate::config::Config;
use crate::core::context::{CommandContext, CommandContextBuilder};
use crate::error::Result;
use log::debug;

/// Command runner that handles routing and execution
pub struct CommandRunner {
    config: Config,
}

impl CommandRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run a command based on CLI arguments
    pub async fn run(&self, cli: Cli) -> Result<()> {
        let command = cli.command();
        debug!("CommandRunner::run() called with command: {:?}", command);

        let ctx = CommandContextBuilder::from_cli(self.config.clone(), &cli).build();
        dispatch(&ctx, command).await
    }
}

async fn dispatch(ctx: &CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Devices(args) => DevicesCommand::new().run(ctx, args).await,
        Commands::Version => VersionCommand::new().run(ctx, ()).await,
        Commands::State => StateCommand::new().run(ctx, ()).await,
        Commands::Shell(args) => ShellCommand::new().run(ctx, args).await,
        Commands::Exec(args) => ShellCommand::exec().run(ctx, args).await,
        Commands::Ls(args) => LsCommand::new().run(ctx, args).await,
        Commands::Push(args) => PushCommand::new().run(ctx, args).await,
        Commands::Pull(args) => PullCommand::new().run(ctx, args).await,
        Commands::Connect(args) => ConnectCommand::new().run(ctx, args).await,
        Commands::Disconnect(args) => ConnectCommand::disconnect().run(ctx, args).await,
        Commands::Tcpip(args) => TcpipCommand::new().run(ctx, args).await,
        Commands::Track => TrackCommand::new().run(ctx, ()).await,
    }
}
