//! Page-based printing through a GDI device context
//!
//! [`DeviceContext`] is the drawing surface the receipt layout is replayed
//! onto. [`PrinterDc`] binds it to a Windows printer driver; tests use
//! recording implementations.

use crate::error::PrintResult;

/// Font request passed to the device context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub face: &'static str,
    /// Cell height in device pixels
    pub height: i32,
    /// 400 normal, 700 bold, 800 extra bold
    pub weight: i32,
}

/// A printer drawing surface
///
/// Call order for one document: `start_doc`, `start_page`, any number of
/// `create_font`/`select_font`/`text_out`, `end_page`, `end_doc`.
/// Implementations release their platform resources on drop and abort a
/// document that was started but never ended.
pub trait DeviceContext {
    type Font: Clone;

    /// Create a font. On error the currently selected font is unchanged.
    fn create_font(&mut self, spec: &FontSpec) -> PrintResult<Self::Font>;

    /// Make `font` the active font for subsequent `text_out` calls
    fn select_font(&mut self, font: &Self::Font);

    fn start_doc(&mut self, title: &str) -> PrintResult<()>;

    fn start_page(&mut self) -> PrintResult<()>;

    /// Draw text with its top-left corner at `(x, y)` in device pixels
    fn text_out(&mut self, x: i32, y: i32, text: &str) -> PrintResult<()>;

    fn end_page(&mut self) -> PrintResult<()>;

    fn end_doc(&mut self) -> PrintResult<()>;
}

#[cfg(windows)]
mod platform {
    use super::{DeviceContext, FontSpec};
    use crate::error::{PrintError, PrintResult};
    use crate::spooler::to_wide;
    use core::ffi::c_void;
    use std::mem::size_of;
    use tracing::{debug, warn};
    use windows::Win32::Graphics::Gdi::{CreateDCW, DeleteDC, HDC};
    use windows::Win32::Storage::Xps::DOCINFOW;
    use windows::core::{PCWSTR, w};

    #[link(name = "gdi32")]
    unsafe extern "system" {
        fn AbortDoc(hdc: HDC) -> i32;
        fn EndDoc(hdc: HDC) -> i32;
        fn EndPage(hdc: HDC) -> i32;
        fn StartDocW(hdc: HDC, lpdi: *const DOCINFOW) -> i32;
        fn StartPage(hdc: HDC) -> i32;
        fn CreateFontW(
            cheight: i32,
            cwidth: i32,
            cescapement: i32,
            corientation: i32,
            cweight: i32,
            bitalic: u32,
            bunderline: u32,
            bstrikeout: u32,
            icharset: u32,
            ioutprecision: u32,
            iclipprecision: u32,
            iquality: u32,
            ipitchandfamily: u32,
            pszfacename: *const u16,
        ) -> *mut c_void;
        fn SelectObject(hdc: HDC, h: *mut c_void) -> *mut c_void;
        fn DeleteObject(ho: *mut c_void) -> i32;
        fn TextOutW(hdc: HDC, x: i32, y: i32, lpstring: *const u16, c: i32) -> i32;
        fn SetBkMode(hdc: HDC, mode: i32) -> i32;
        fn SetTextColor(hdc: HDC, color: u32) -> u32;
    }

    const DEFAULT_CHARSET: u32 = 1;
    const TRANSPARENT: i32 = 1;

    /// Font handle owned by the [`PrinterDc`] that created it
    #[derive(Debug, Clone, Copy)]
    pub struct GdiFont(*mut c_void);

    /// Printer device context created through the WINSPOOL driver
    pub struct PrinterDc {
        hdc: HDC,
        fonts: Vec<*mut c_void>,
        original_font: Option<*mut c_void>,
        doc_active: bool,
        page_active: bool,
    }

    impl PrinterDc {
        pub fn create(printer: &str) -> PrintResult<Self> {
            let printer_w = to_wide(printer);
            let hdc = unsafe {
                CreateDCW(
                    w!("WINSPOOL"),
                    PCWSTR::from_raw(printer_w.as_ptr()),
                    PCWSTR::null(),
                    None,
                )
            };
            if hdc.is_invalid() {
                return Err(PrintError::WindowsPrinter(format!(
                    "CreateDCW({}) failed: {}",
                    printer,
                    std::io::Error::last_os_error()
                )));
            }

            unsafe {
                SetBkMode(hdc, TRANSPARENT);
                SetTextColor(hdc, 0x0000_0000);
            }
            debug!(printer, "device context created");

            Ok(Self {
                hdc,
                fonts: Vec::new(),
                original_font: None,
                doc_active: false,
                page_active: false,
            })
        }

        fn check(r: i32, what: &str) -> PrintResult<()> {
            if r <= 0 {
                return Err(PrintError::WindowsPrinter(format!(
                    "{} failed: {}",
                    what,
                    std::io::Error::last_os_error()
                )));
            }
            Ok(())
        }
    }

    impl DeviceContext for PrinterDc {
        type Font = GdiFont;

        fn create_font(&mut self, spec: &FontSpec) -> PrintResult<GdiFont> {
            let face = to_wide(spec.face);
            let h = unsafe {
                CreateFontW(
                    spec.height,
                    0,
                    0,
                    0,
                    spec.weight,
                    0,
                    0,
                    0,
                    DEFAULT_CHARSET,
                    0,
                    0,
                    0,
                    0,
                    face.as_ptr(),
                )
            };
            if h.is_null() {
                return Err(PrintError::Font(format!(
                    "{} {}px weight {}",
                    spec.face, spec.height, spec.weight
                )));
            }
            self.fonts.push(h);
            Ok(GdiFont(h))
        }

        fn select_font(&mut self, font: &GdiFont) {
            let previous = unsafe { SelectObject(self.hdc, font.0) };
            if self.original_font.is_none() && !previous.is_null() {
                self.original_font = Some(previous);
            }
        }

        fn start_doc(&mut self, title: &str) -> PrintResult<()> {
            let title_w = to_wide(title);
            let di = DOCINFOW {
                cbSize: size_of::<DOCINFOW>() as i32,
                lpszDocName: PCWSTR::from_raw(title_w.as_ptr()),
                ..Default::default()
            };
            Self::check(unsafe { StartDocW(self.hdc, &di) }, "StartDoc")?;
            self.doc_active = true;
            Ok(())
        }

        fn start_page(&mut self) -> PrintResult<()> {
            Self::check(unsafe { StartPage(self.hdc) }, "StartPage")?;
            self.page_active = true;
            Ok(())
        }

        fn text_out(&mut self, x: i32, y: i32, text: &str) -> PrintResult<()> {
            let wide: Vec<u16> = text.encode_utf16().collect();
            let ok = unsafe { TextOutW(self.hdc, x, y, wide.as_ptr(), wide.len() as i32) };
            Self::check(ok, "TextOut")
        }

        fn end_page(&mut self) -> PrintResult<()> {
            self.page_active = false;
            Self::check(unsafe { EndPage(self.hdc) }, "EndPage")
        }

        fn end_doc(&mut self) -> PrintResult<()> {
            self.doc_active = false;
            Self::check(unsafe { EndDoc(self.hdc) }, "EndDoc")
        }
    }

    impl Drop for PrinterDc {
        fn drop(&mut self) {
            unsafe {
                if self.doc_active {
                    warn!(page_open = self.page_active, "aborting unfinished document");
                    let _ = AbortDoc(self.hdc);
                }
                if let Some(original) = self.original_font.take() {
                    SelectObject(self.hdc, original);
                }
                for font in self.fonts.drain(..) {
                    let _ = DeleteObject(font);
                }
                let _ = DeleteDC(self.hdc);
            }
            debug!("device context released");
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::{DeviceContext, FontSpec};
    use crate::error::{PrintError, PrintResult};

    #[derive(Debug, Clone, Copy)]
    pub struct GdiFont;

    /// Printer device context; only available on Windows
    #[derive(Debug)]
    pub struct PrinterDc {
        _private: (),
    }

    impl PrinterDc {
        pub fn create(printer: &str) -> PrintResult<Self> {
            Err(PrintError::NotSupported(format!(
                "GDI printing to '{}' requires Windows",
                printer
            )))
        }
    }

    impl DeviceContext for PrinterDc {
        type Font = GdiFont;

        fn create_font(&mut self, _spec: &FontSpec) -> PrintResult<GdiFont> {
            Err(unsupported())
        }

        fn select_font(&mut self, _font: &GdiFont) {}

        fn start_doc(&mut self, _title: &str) -> PrintResult<()> {
            Err(unsupported())
        }

        fn start_page(&mut self) -> PrintResult<()> {
            Err(unsupported())
        }

        fn text_out(&mut self, _x: i32, _y: i32, _text: &str) -> PrintResult<()> {
            Err(unsupported())
        }

        fn end_page(&mut self) -> PrintResult<()> {
            Err(unsupported())
        }

        fn end_doc(&mut self) -> PrintResult<()> {
            Err(unsupported())
        }
    }

    fn unsupported() -> PrintError {
        PrintError::NotSupported("GDI printing requires Windows".to_string())
    }
}

pub use platform::{GdiFont, PrinterDc};
