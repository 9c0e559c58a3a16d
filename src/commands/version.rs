use crate::cli::OutputType;
use crate::commands::{blocking, SubCommand};
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::json;

pub struct VersionCommand;

impl VersionCommand {
    pub fn new() -> Self {
        Self
    }
}

/// The daemon reports its version as 4 hex digits, e.g. `0029` for 41
fn decode(version: &str) -> Option<u32> {
    u32::from_str_radix(version.trim(), 16).ok()
}

#[async_trait]
impl SubCommand for VersionCommand {
    type Args = ();

    async fn run(&self, ctx: &CommandContext, _args: Self::Args) -> Result<()> {
        let connection = ctx.connection.clone();
        let version = blocking(move || connection.host_version()).await?;

        match ctx.output_format {
            OutputType::Json => ctx.formatter().json(&json!({
                "raw": version,
                "version": decode(&version),
            })),
            _ => {
                match decode(&version) {
                    Some(number) => println!("Android Debug Bridge server version {}", number),
                    None => println!("{}", version),
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(decode("0029"), Some(41));
        assert_eq!(decode("001f\n"), Some(31));
        assert_eq!(decode("zz"), None);
    }
}
