//! # kermes-printer
//!
//! Receipt printer access - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Code-page encoding for thermal printers
//! - Raw byte sinks: TCP port 9100, device files, Windows spooler, USB bulk
//! - Print spooler queues (default printer, job listing and deletion)
//! - Page drawing through a GDI device context
//! - USB device enumeration
//!
//! WHAT to print (receipt layout) lives in `kermes-receipt`.
//!
//! ## Example
//!
//! ```no_run
//! use kermes_printer::{CodePage, EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new(CodePage::WPC1252);
//! builder.center();
//! builder.scale(2);
//! builder.line("Münih Fatih Kermes");
//! builder.reset_size();
//! builder.left();
//! builder.line("Adet: 2");
//! builder.cut_feed(3);
//!
//! let printer = NetworkPrinter::from_addr("192.168.1.100:9100")?;
//! printer.print(&builder.build())?;
//! # Ok::<(), kermes_printer::PrintError>(())
//! ```

mod encoding;
mod error;
mod escpos;
mod gdi;
mod printer;
mod spooler;
mod usb;

// Re-exports
pub use encoding::{CodePage, encode_text};
pub use error::{PrintError, PrintResult};
pub use escpos::{Alignment, EscPosBuilder};
pub use gdi::{DeviceContext, FontSpec, GdiFont, PrinterDc};
pub use printer::{FilePrinter, NetworkPrinter, Printer, WindowsPrinter};
pub use spooler::{JobInfo, PrintSpooler, PrinterHandle, SpoolerHandle, WindowsSpooler};
pub use usb::{LibUsbEnumerator, UsbDeviceInfo, UsbEnumerator, UsbPrinter};
