use crate::adb::Connection;
use crate::cli::{Cli, OutputType};
use crate::config::Config;
use crate::device::Device;
use crate::output::OutputFormatter;
use log::debug;
use std::time::Duration;

/// Shared context for all commands
#[derive(Clone)]
pub struct CommandContext {
    pub connection: Connection,
    /// Serial picked with `--serial`, already resolved through the aliases
    pub serial: Option<String>,
    pub output_format: OutputType,
    pub config: Config,
}

impl CommandContext {
    /// Device the command should target: the selected serial, or whichever
    /// single device is attached
    pub fn device(&self) -> Device {
        match &self.serial {
            Some(serial) => self.connection.device(serial.as_str()),
            None => self.connection.any_device(),
        }
    }

    pub fn formatter(&self) -> OutputFormatter {
        OutputFormatter::new()
    }

    /// Progress bars only make sense when a human reads the output
    pub fn should_show_progress(&self) -> bool {
        self.output_format != OutputType::Json
    }
}

/// Builder for creating command contexts
pub struct CommandContextBuilder {
    config: Config,
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
    serial: Option<String>,
    output_format: OutputType,
}

impl CommandContextBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            host: None,
            port: None,
            timeout: None,
            serial: None,
            output_format: OutputType::Table,
        }
    }

    /// Apply the global command-line flags
    pub fn from_cli(config: Config, cli: &Cli) -> Self {
        let mut builder = Self::new(config).output_format(cli.output);
        builder.host = cli.host.clone();
        builder.port = cli.port;
        builder.timeout = cli.timeout.filter(|secs| *secs > 0).map(Duration::from_secs);
        builder.serial = cli.serial.clone();
        builder
    }

    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn output_format(mut self, format: OutputType) -> Self {
        self.output_format = format;
        self
    }

    pub fn build(self) -> CommandContext {
        let mut config = self.config;
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        let connection = match self.timeout {
            Some(timeout) => Connection::with_timeout(config.host.clone(), config.port, timeout),
            None => Connection::from_config(&config),
        };
        let serial = self.serial.map(|name| config.resolve_alias(&name));
        debug!(
            "Using daemon at {}:{}, device {:?}",
            config.host, config.port, serial
        );

        CommandContext {
            connection,
            serial,
            output_format: self.output_format,
            config,
        }
    }
}
