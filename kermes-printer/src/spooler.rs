//! Print spooler access: default printer lookup, printer handles, job queues
//!
//! A [`SpoolerHandle`] is the scoped printer handle. Implementations close
//! the underlying handle when the value is dropped, so a handle is released
//! exactly once whichever way the caller leaves its scope.

use crate::error::{PrintError, PrintResult};

/// A job waiting in a printer queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub id: u32,
    pub document: Option<String>,
}

/// An open printer handle
pub trait SpoolerHandle {
    /// Jobs currently queued on the printer
    fn jobs(&self) -> PrintResult<Vec<JobInfo>>;

    /// Delete a queued job
    fn delete_job(&self, id: u32) -> PrintResult<()>;
}

/// The platform print spooler
pub trait PrintSpooler {
    type Handle: SpoolerHandle;

    /// Name of the system default printer
    fn default_printer(&self) -> PrintResult<String>;

    /// Open a printer by name
    fn open(&self, printer: &str) -> PrintResult<Self::Handle>;
}

/// Win32 spooler (`winspool`)
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSpooler;

#[cfg(windows)]
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Open printer handle, closed on drop
#[cfg(windows)]
#[derive(Debug)]
pub struct PrinterHandle(windows::Win32::Graphics::Printing::PRINTER_HANDLE);

#[cfg(windows)]
impl PrinterHandle {
    pub(crate) fn raw(&self) -> windows::Win32::Graphics::Printing::PRINTER_HANDLE {
        self.0
    }
}

#[cfg(windows)]
impl Drop for PrinterHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = windows::Win32::Graphics::Printing::ClosePrinter(self.0);
        }
        tracing::debug!("printer handle closed");
    }
}

#[cfg(windows)]
pub(crate) fn open_printer(name: &str) -> PrintResult<PrinterHandle> {
    use windows::Win32::Graphics::Printing::{OpenPrinterW, PRINTER_HANDLE};
    use windows::core::PCWSTR;

    let mut handle = PRINTER_HANDLE::default();
    let name_w = to_wide(name);

    unsafe {
        OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None).map_err(|e| {
            PrintError::WindowsPrinter(format!("OpenPrinterW({}) failed: {}", name, e))
        })?;
    }
    tracing::debug!(printer = name, "printer handle opened");
    Ok(PrinterHandle(handle))
}

#[cfg(windows)]
#[link(name = "winspool")]
unsafe extern "system" {
    fn SetJobW(
        hprinter: windows::Win32::Graphics::Printing::PRINTER_HANDLE,
        jobid: u32,
        level: u32,
        pjob: *const u8,
        command: u32,
    ) -> i32;
}

#[cfg(windows)]
const JOB_CONTROL_DELETE: u32 = 5;

#[cfg(windows)]
impl SpoolerHandle for PrinterHandle {
    fn jobs(&self) -> PrintResult<Vec<JobInfo>> {
        use windows::Win32::Graphics::Printing::{EnumJobsW, JOB_INFO_1W};
        use windows::core::PWSTR;

        unsafe {
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumJobsW(self.0, 0, u32::MAX, 1, None, &mut needed, &mut returned);

            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumJobsW(
                self.0,
                0,
                u32::MAX,
                1,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|e| PrintError::WindowsPrinter(format!("EnumJobsW failed: {}", e)))?;

            let ptr = buf.as_ptr() as *const JOB_INFO_1W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            Ok(slice
                .iter()
                .map(|info| JobInfo {
                    id: info.JobId,
                    document: if info.pDocument.is_null() {
                        None
                    } else {
                        PWSTR(info.pDocument.0).to_string().ok()
                    },
                })
                .collect())
        }
    }

    fn delete_job(&self, id: u32) -> PrintResult<()> {
        let ok = unsafe { SetJobW(self.0, id, 0, std::ptr::null(), JOB_CONTROL_DELETE) };
        if ok == 0 {
            return Err(PrintError::WindowsPrinter(format!(
                "SetJobW failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        Ok(())
    }
}

#[cfg(windows)]
impl PrintSpooler for WindowsSpooler {
    type Handle = PrinterHandle;

    fn default_printer(&self) -> PrintResult<String> {
        use windows::Win32::Graphics::Printing::GetDefaultPrinterW;
        use windows::core::PWSTR;

        unsafe {
            let mut needed: u32 = 0;
            let _ = GetDefaultPrinterW(None, &mut needed);

            if needed == 0 {
                return Err(PrintError::WindowsPrinter(
                    "No default printer configured".to_string(),
                ));
            }

            let mut buf: Vec<u16> = vec![0; needed as usize];
            let ok = GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed);

            if !ok.as_bool() {
                return Err(PrintError::WindowsPrinter(
                    "GetDefaultPrinterW failed".to_string(),
                ));
            }

            PWSTR(buf.as_mut_ptr())
                .to_string()
                .map_err(|e| PrintError::WindowsPrinter(format!("UTF-16 decode failed: {}", e)))
        }
    }

    fn open(&self, printer: &str) -> PrintResult<PrinterHandle> {
        open_printer(printer)
    }
}

/// Placeholder handle on platforms without a spooler binding
#[cfg(not(windows))]
#[derive(Debug)]
pub struct PrinterHandle {
    _private: (),
}

#[cfg(not(windows))]
impl SpoolerHandle for PrinterHandle {
    fn jobs(&self) -> PrintResult<Vec<JobInfo>> {
        Err(not_supported())
    }

    fn delete_job(&self, _id: u32) -> PrintResult<()> {
        Err(not_supported())
    }
}

#[cfg(not(windows))]
impl PrintSpooler for WindowsSpooler {
    type Handle = PrinterHandle;

    fn default_printer(&self) -> PrintResult<String> {
        Err(not_supported())
    }

    fn open(&self, _printer: &str) -> PrintResult<PrinterHandle> {
        Err(not_supported())
    }
}

#[cfg(not(windows))]
fn not_supported() -> PrintError {
    PrintError::NotSupported("print spooler requires Windows".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_spooler_unsupported_off_windows() {
        let spooler = WindowsSpooler;
        assert!(matches!(
            spooler.default_printer(),
            Err(PrintError::NotSupported(_))
        ));
        assert!(matches!(
            spooler.open("POS-80"),
            Err(PrintError::NotSupported(_))
        ));
    }
}
