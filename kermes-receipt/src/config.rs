//! Command line and environment configuration

use crate::error::{ReceiptError, ReceiptResult};
use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Header name used when the POS does not pass one
pub const DEFAULT_DISPLAY_NAME: &str = "Münih Fatih Kermes";

/// Kermes receipt printer - prints a POS cart read from stdin
#[derive(Parser, Debug)]
#[command(name = "kermes-receipt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name printed in the receipt header
    #[arg(default_value = DEFAULT_DISPLAY_NAME)]
    pub display_name: String,

    /// Delete every pending job on the printer queue and exit
    #[arg(long, env = "CLEAR_QUEUE", value_parser = FalseyValueParser::new())]
    pub clear_queue: bool,

    /// List attached USB devices and exit
    #[arg(long)]
    pub list_usb: bool,

    /// Rendering backend
    #[arg(long, value_enum, env = "RECEIPT_MODE", default_value_t = Mode::Page)]
    pub mode: Mode,

    /// Printer name (defaults to the system default printer)
    #[arg(long, env = "RECEIPT_PRINTER")]
    pub printer: Option<String>,

    /// Where stream mode sends its bytes: spooler[:NAME], tcp://HOST:PORT,
    /// usb://VID:PID or a device path
    #[arg(long, env = "RECEIPT_TARGET", default_value = "spooler")]
    pub target: StreamTarget,

    /// Print the computed layout to stdout instead of printing
    #[arg(long)]
    pub preview: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "RECEIPT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "RECEIPT_LOG_JSON", value_parser = FalseyValueParser::new())]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// GDI page printer
    Page,
    /// ESC/POS thermal command stream
    Stream,
}

/// Destination for the ESC/POS byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTarget {
    /// Windows RAW spooler job; `None` uses the printer option or the default printer
    Spooler(Option<String>),
    /// Raw TCP, usually port 9100
    Tcp(String),
    /// USB bulk endpoint, `VID:PID` in hex
    Usb(String),
    /// Device node or file
    File(PathBuf),
}

impl FromStr for StreamTarget {
    type Err = ReceiptError;

    fn from_str(s: &str) -> ReceiptResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReceiptError::Config("empty stream target".to_string()));
        }
        if s == "spooler" {
            return Ok(StreamTarget::Spooler(None));
        }
        if let Some(name) = s.strip_prefix("spooler:") {
            return Ok(StreamTarget::Spooler(Some(name.to_string())));
        }
        if let Some(addr) = s.strip_prefix("tcp://") {
            if !addr.contains(':') {
                return Err(ReceiptError::Config(format!(
                    "tcp target needs HOST:PORT, got '{}'",
                    addr
                )));
            }
            return Ok(StreamTarget::Tcp(addr.to_string()));
        }
        if let Some(ids) = s.strip_prefix("usb://") {
            return Ok(StreamTarget::Usb(ids.to_string()));
        }
        Ok(StreamTarget::File(PathBuf::from(s)))
    }
}

/// What one invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ClearQueue,
    ListUsb,
    Print(Mode),
}

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub display_name: String,
    pub action: Action,
    pub printer: Option<String>,
    pub target: StreamTarget,
    pub preview: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let action = if cli.clear_queue {
            Action::ClearQueue
        } else if cli.list_usb {
            Action::ListUsb
        } else {
            Action::Print(cli.mode)
        };

        Self {
            display_name: cli.display_name,
            action,
            printer: cli.printer,
            target: cli.target,
            preview: cli.preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["kermes-receipt"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn test_display_name_argument() {
        let config = parse(&["Yaz Kermesi"]);
        assert_eq!(config.display_name, "Yaz Kermesi");
    }

    #[test]
    fn test_clear_queue_wins() {
        let config = parse(&["--clear-queue", "--list-usb", "--mode", "stream"]);
        assert_eq!(config.action, Action::ClearQueue);
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(parse(&["--list-usb"]).action, Action::ListUsb);
        assert_eq!(
            parse(&["Kermes", "--mode", "stream"]).action,
            Action::Print(Mode::Stream)
        );
    }

    #[test]
    fn test_stream_targets() {
        assert_eq!(
            "spooler".parse::<StreamTarget>().unwrap(),
            StreamTarget::Spooler(None)
        );
        assert_eq!(
            "spooler:POS-80".parse::<StreamTarget>().unwrap(),
            StreamTarget::Spooler(Some("POS-80".to_string()))
        );
        assert_eq!(
            "tcp://192.168.1.50:9100".parse::<StreamTarget>().unwrap(),
            StreamTarget::Tcp("192.168.1.50:9100".to_string())
        );
        assert_eq!(
            "usb://0519:2013".parse::<StreamTarget>().unwrap(),
            StreamTarget::Usb("0519:2013".to_string())
        );
        assert_eq!(
            "/dev/usb/lp0".parse::<StreamTarget>().unwrap(),
            StreamTarget::File(PathBuf::from("/dev/usb/lp0"))
        );
    }

    #[test]
    fn test_invalid_stream_targets() {
        assert!("tcp://printer".parse::<StreamTarget>().is_err());
        assert!("  ".parse::<StreamTarget>().is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["kermes-receipt", "--mode", "fax"]).is_err());
    }
}
