use thiserror::Error;

/// Everything that can go wrong between a finished layout and paper
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device node missing or printer not reachable
    #[error("Printer offline: {0}")]
    Offline(String),

    #[error("Printer timed out: {0}")]
    Timeout(String),

    /// Bad address, device ids or printer name
    #[error("Invalid printer configuration: {0}")]
    InvalidConfig(String),

    /// The requested capability has no binding on this platform/build
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Font could not be created on the device context
    #[error("Font creation failed: {0}")]
    Font(String),

    #[error("USB error: {0}")]
    Usb(String),

    /// A Win32 spooler or GDI call failed
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    WindowsPrinter(String),
}

pub type PrintResult<T> = Result<T, PrintError>;

#[cfg(feature = "usb")]
impl From<rusb::Error> for PrintError {
    fn from(e: rusb::Error) -> Self {
        PrintError::Usb(e.to_string())
    }
}
