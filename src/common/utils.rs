//! Utility functions for leaderkv

use std::time::Duration;

use crate::common::{Error, Result};

/// Parse duration string (e.g., "500ms", "3s", "1m")
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidConfig("empty duration".into()));
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| Error::InvalidConfig(format!("missing duration unit: {}", s)))?;
    let (num_str, unit) = s.split_at(split);

    let num: u64 = num_str
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("invalid duration: {}", s)))?;

    let duration = match unit {
        "ms" => Duration::from_millis(num),
        "s" => Duration::from_secs(num),
        "m" => Duration::from_secs(num * 60),
        _ => {
            return Err(Error::InvalidConfig(format!(
                "unknown duration unit: {}",
                unit
            )))
        }
    };

    Ok(duration)
}

/// Validate a node address of the form `host:port`.
///
/// Hostnames are allowed; resolution happens at connect time.
pub fn validate_address(addr: &str) -> Result<()> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| Error::InvalidAddress(format!("{:?} is missing a port", addr)))?;

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(Error::InvalidAddress(format!("{:?} has an invalid host", addr)));
    }

    port.parse::<u16>()
        .map_err(|_| Error::InvalidAddress(format!("{:?} has an invalid port", addr)))?;

    Ok(())
}
