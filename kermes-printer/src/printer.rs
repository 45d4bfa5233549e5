//! Byte sinks for encoded ESC/POS jobs: raw TCP, a device node or file,
//! and a RAW job on the Windows spooler. The USB sink lives in `usb`.

use crate::error::{PrintError, PrintResult};
use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Something an encoded job can be written to
pub trait Printer {
    /// Deliver one complete job
    fn print(&self, data: &[u8]) -> PrintResult<()>;
}

impl<P: Printer + ?Sized> Printer for Box<P> {
    fn print(&self, data: &[u8]) -> PrintResult<()> {
        (**self).print(data)
    }
}

/// Thermal printer listening for raw jobs on TCP (usually port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

const NETWORK_TIMEOUT: Duration = Duration::from_secs(5);

impl NetworkPrinter {
    /// Resolve `host:port`; the first resolved address is used
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let bad = || PrintError::InvalidConfig(format!("cannot resolve printer address '{}'", addr));
        let resolved = addr.to_socket_addrs().map_err(|_| bad())?.next().ok_or_else(bad)?;

        Ok(Self {
            addr: resolved,
            timeout: NETWORK_TIMEOUT,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = match TcpStream::connect_timeout(&self.addr, self.timeout) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                return Err(PrintError::Timeout(format!(
                    "no answer from {} within {:?}",
                    self.addr, self.timeout
                )));
            }
            Err(e) => return Err(PrintError::Connection(format!("{}: {}", self.addr, e))),
        };
        stream.set_write_timeout(Some(self.timeout))?;
        stream.write_all(data)?;
        stream.flush()?;

        info!("Receipt sent over TCP");
        Ok(())
    }
}

/// Printer reached through a device node or file
#[derive(Debug, Clone)]
pub struct FilePrinter {
    path: PathBuf,
}

impl FilePrinter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Printer for FilePrinter {
    #[instrument(skip(data), fields(path = %self.path.display(), data_len = data.len()))]
    fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| PrintError::Offline(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(data)?;
        file.flush()?;
        info!("Print data written");
        Ok(())
    }
}

/// Installed Windows printer fed with a RAW spooler job
///
/// The bytes bypass the driver's rendering, so the queue must belong to an
/// ESC/POS capable device.
#[derive(Debug, Clone)]
pub struct WindowsPrinter {
    name: String,
}

impl WindowsPrinter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(windows)]
impl Printer for WindowsPrinter {
    #[instrument(skip(data), fields(printer = %self.name, data_len = data.len()))]
    fn print(&self, data: &[u8]) -> PrintResult<()> {
        use windows::Win32::Graphics::Printing::{
            DOC_INFO_1W, EndDocPrinter, EndPagePrinter, StartDocPrinterW, StartPagePrinter,
            WritePrinter,
        };
        use windows::core::PWSTR;

        /// Ends the page and document of a started job on every exit path
        struct RawJob<'a> {
            handle: &'a crate::spooler::PrinterHandle,
            page_open: bool,
        }

        impl Drop for RawJob<'_> {
            fn drop(&mut self) {
                unsafe {
                    if self.page_open {
                        let _ = EndPagePrinter(self.handle.raw());
                    }
                    let _ = EndDocPrinter(self.handle.raw());
                }
            }
        }

        let failed = |call: &str| {
            PrintError::WindowsPrinter(format!(
                "{} on '{}': {}",
                call,
                self.name,
                std::io::Error::last_os_error()
            ))
        };

        let handle = crate::spooler::open_printer(&self.name)?;
        let mut doc_name = crate::spooler::to_wide("Kermes Receipt");
        let mut datatype = crate::spooler::to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name.as_mut_ptr()),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype.as_mut_ptr()),
        };

        if unsafe { StartDocPrinterW(handle.raw(), 1, &doc_info) } == 0 {
            return Err(failed("StartDocPrinter"));
        }
        let mut job = RawJob {
            handle: &handle,
            page_open: false,
        };

        if !unsafe { StartPagePrinter(handle.raw()) }.as_bool() {
            return Err(failed("StartPagePrinter"));
        }
        job.page_open = true;

        let mut written = 0u32;
        let ok = unsafe {
            WritePrinter(handle.raw(), data.as_ptr().cast(), data.len() as u32, &mut written)
        };
        if !ok.as_bool() {
            return Err(failed("WritePrinter"));
        }
        if written as usize != data.len() {
            return Err(PrintError::WindowsPrinter(format!(
                "spooler accepted {} of {} bytes",
                written,
                data.len()
            )));
        }
        drop(job);

        info!("RAW job spooled");
        Ok(())
    }
}

#[cfg(not(windows))]
impl Printer for WindowsPrinter {
    fn print(&self, _data: &[u8]) -> PrintResult<()> {
        Err(PrintError::NotSupported(format!(
            "spooler printing to '{}' requires Windows",
            self.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_target_resolves_port() {
        let printer = NetworkPrinter::from_addr("127.0.0.1:9100").unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_tcp_target_without_port_is_rejected() {
        assert!(matches!(
            NetworkPrinter::from_addr("kasse-drucker"),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_file_printer_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lp0");
        let printer = FilePrinter::new(&path);

        printer.print(&[0x1B, 0x40, b'A']).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x1B, 0x40, b'A']);
    }

    #[test]
    fn test_file_printer_missing_dir_is_offline() {
        let dir = tempfile::tempdir().unwrap();
        let printer = FilePrinter::new(dir.path().join("missing").join("lp0"));

        let err = printer.print(b"x").unwrap_err();
        assert!(matches!(err, PrintError::Offline(_)));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_windows_printer_unsupported() {
        let err = WindowsPrinter::new("POS-80").print(b"x").unwrap_err();
        assert!(matches!(err, PrintError::NotSupported(_)));
    }
}
