use super::commands::Cli;
use rln_relay::LoggingConfig;
use rln_types::{RlnError, RlnResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> RlnResult<()> {
    let level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => logging.level.to_string(),
            1 => "info,rln_relay=debug".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let log_file = cli.log_file.clone().or_else(|| logging.file.clone());
    let result = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| RlnError::Config(format!("Failed to open log file {:?}: {}", path, e)))?;
            let writer = std::sync::Mutex::new(file);
            if logging.json {
                subscriber.with(fmt::layer().json().with_writer(writer)).try_init()
            } else {
                subscriber
                    .with(fmt::layer().with_writer(writer).with_ansi(false))
                    .try_init()
            }
        }
        None if logging.json => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        None => subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(cli.verbose >= 2),
            )
            .try_init(),
    };

    result.map_err(|e| RlnError::Internal(format!("Failed to install logger: {}", e)))
}

pub fn decode_hex(s: &str, what: &str) -> RlnResult<Vec<u8>> {
    hex::decode(s.trim().trim_start_matches("0x"))
        .map_err(|e| RlnError::InvalidArgument(format!("Invalid {} hex: {}", what, e)))
}

pub fn print_json(value: &serde_json::Value) -> RlnResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| RlnError::Serialization(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_prefix() {
        assert_eq!(decode_hex("0x0aff", "x").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex(" 0aff\n", "x").unwrap(), vec![0x0a, 0xff]);
        assert!(decode_hex("", "x").unwrap().is_empty());
    }

    #[test]
    fn test_decode_hex_rejects_garbage() {
        assert!(matches!(decode_hex("zz", "x"), Err(RlnError::InvalidArgument(_))));
        assert!(decode_hex("abc", "x").is_err());
    }
}
