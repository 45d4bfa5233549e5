//! One invocation: read the cart, lay it out, hand it to the printer

use crate::cart::Cart;
use crate::config::{Action, Config, Mode, StreamTarget};
use crate::error::ReceiptResult;
use crate::layout::{PageLayout, render_page};
use crate::page::print_page;
use crate::queue::clear_queue;
use crate::shutdown::Shutdown;
use crate::stream::{CommandToken, encode_stream, render_stream};
use crate::usb_list::list_usb_devices;
use kermes_printer::{
    CodePage, FilePrinter, LibUsbEnumerator, NetworkPrinter, PrintSpooler, Printer, PrinterDc,
    UsbPrinter, WindowsPrinter, WindowsSpooler,
};
use std::io::{Read, Write};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// A shutdown signal arrived before the printer was acquired
    Interrupted,
}

#[instrument(skip_all, fields(action = ?config.action))]
pub fn run(
    config: &Config,
    input: impl Read,
    out: &mut impl Write,
    err: &mut impl Write,
    shutdown: &Shutdown,
) -> ReceiptResult<Outcome> {
    let spooler = WindowsSpooler;

    match &config.action {
        Action::ClearQueue => {
            if shutdown.is_requested() {
                return Ok(interrupted());
            }
            let printer = resolve_printer(&spooler, config.printer.as_deref())?;
            let attempted = clear_queue(&spooler, &printer, err)?;
            info!(printer = %printer, attempted, "queue cleared");
            writeln!(out, "Print queue cleared.")?;
        }
        Action::ListUsb => {
            list_usb_devices(&LibUsbEnumerator, out)?;
        }
        Action::Print(mode) => {
            let cart = Cart::from_reader(input)?;
            let now = chrono::Local::now().naive_local();

            match mode {
                Mode::Page => {
                    let layout = render_page(&config.display_name, &cart, now);
                    if config.preview {
                        write_page_preview(&layout, out)?;
                    } else {
                        if shutdown.is_requested() {
                            return Ok(interrupted());
                        }
                        let printer = resolve_printer(&spooler, config.printer.as_deref())?;
                        let mut dc = PrinterDc::create(&printer)?;
                        let report = print_page(&mut dc, &layout)?;
                        info!(printer = %printer, drawn = report.drawn, "receipt page printed");
                    }
                }
                Mode::Stream => {
                    let tokens = render_stream(&config.display_name, &cart, now);
                    if config.preview {
                        write_stream_preview(&tokens, out)?;
                    } else {
                        if shutdown.is_requested() {
                            return Ok(interrupted());
                        }
                        let bytes = encode_stream(&tokens, CodePage::default());
                        let printer = stream_printer(&spooler, config)?;
                        printer.print(&bytes)?;
                        info!(bytes = bytes.len(), "receipt stream sent");
                    }
                }
            }
        }
    }

    Ok(Outcome::Completed)
}

fn interrupted() -> Outcome {
    info!("shutdown requested, printer not acquired");
    Outcome::Interrupted
}

fn resolve_printer<S: PrintSpooler>(spooler: &S, name: Option<&str>) -> ReceiptResult<String> {
    match name {
        Some(n) => Ok(n.to_string()),
        None => Ok(spooler.default_printer()?),
    }
}

fn stream_printer<S: PrintSpooler>(spooler: &S, config: &Config) -> ReceiptResult<Box<dyn Printer>> {
    let printer: Box<dyn Printer> = match &config.target {
        StreamTarget::Spooler(name) => {
            let name = resolve_printer(spooler, name.as_deref().or(config.printer.as_deref()))?;
            Box::new(WindowsPrinter::new(&name))
        }
        StreamTarget::Tcp(addr) => Box::new(NetworkPrinter::from_addr(addr)?),
        StreamTarget::Usb(ids) => Box::new(UsbPrinter::from_ids(ids)?),
        StreamTarget::File(path) => Box::new(FilePrinter::new(path)),
    };
    Ok(printer)
}

/// `x,y [font] text`, one line per instruction
pub fn write_page_preview(layout: &PageLayout, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "# {}", layout.title)?;
    for d in &layout.instructions {
        writeln!(out, "{},{} [{}] {}", d.x, d.y, d.font.name(), d.text)?;
    }
    Ok(())
}

pub fn write_stream_preview(tokens: &[CommandToken], out: &mut impl Write) -> std::io::Result<()> {
    for token in tokens {
        match token {
            CommandToken::SetAlignment { align, scale } => {
                writeln!(out, "align {:?} x{}", align, scale)?
            }
            CommandToken::EmitText(text) => writeln!(out, "text {:?}", text)?,
            CommandToken::Cut => writeln!(out, "cut")?,
        }
    }
    Ok(())
}
