use crate::commands::{
    devices::DevicesArgs,
    ls::LsArgs,
    pull::PullArgs,
    push::PushArgs,
    server::{ConnectArgs, TcpipArgs},
    shell::ShellArgs,
};
use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    Table,
    Json,
    Plain,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,

    /// ADB server hostname (overrides the config file)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// ADB server port (overrides the config file and ANDROID_ADB_SERVER_PORT)
    #[arg(long, short = 'p', global = true)]
    pub port: Option<u16>,

    /// Read timeout in seconds
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<u64>,

    /// Device serial or alias from the config file
    #[arg(long, short = 's', global = true)]
    pub serial: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputType::Table)]
    pub output: OutputType,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Lists attached devices
    Devices(DevicesArgs),

    /// Gets the server version
    Version,

    /// Gets the state of the selected device
    State,

    /// Runs a shell command on a device
    Shell(ShellArgs),

    /// Runs a command through exec:, output is passed through untouched
    Exec(ShellArgs),

    /// Lists a directory on a device
    Ls(LsArgs),

    /// Copies a local file to a device
    Push(PushArgs),

    /// Copies a file from a device
    Pull(PullArgs),

    /// Connects the server to a device over TCP
    Connect(ConnectArgs),

    /// Disconnects a TCP device
    Disconnect(ConnectArgs),

    /// Restarts adbd on the device listening on TCP
    Tcpip(TcpipArgs),

    /// Prints device changes until interrupted
    Track,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Devices(DevicesArgs::default()))
    }
}
