use crate::error::{AdbError, Result};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_DEVICE_TCP_PORT: u16 = 5555;

/// Quote one argument for the device shell
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// `command` followed by each argument, quoted
pub fn build_command_line(command: &str, args: &[&str]) -> String {
    let mut line = String::from(command);
    for arg in args {
        line.push(' ');
        line.push_str(&quote(arg));
    }
    line
}

/// Split `host[:port]`, defaulting to the device TCP port
pub fn parse_address(address: &str) -> Result<(String, u16)> {
    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => {
            let port = port
                .parse::<u16>()
                .map_err(|_| AdbError::InvalidRequest(format!("invalid port in {}", address)))?;
            Ok((host.to_string(), port))
        }
        Some(_) => Err(AdbError::InvalidRequest(format!("missing host in {}", address))),
        None if address.is_empty() => Err(AdbError::InvalidRequest("empty address".into())),
        None => Ok((address.to_string(), DEFAULT_DEVICE_TCP_PORT)),
    }
}

/// Seconds since the epoch as the sync protocol stores them. Times before
/// the epoch give 0, times past 2106 saturate.
pub fn epoch_seconds(time: SystemTime) -> u32 {
    time.duration_since(UNIX_EPOCH)
        .map(|age| u32::try_from(age.as_secs()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

pub fn print_colored_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = colored_json::to_colored_json_auto(&serde_json::to_value(data)?)?;
    println!("{}", json);
    Ok(())
}
