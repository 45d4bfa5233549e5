//! Code-page encoding for ESC/POS thermal printers
//!
//! Receipt text is built as UTF-8 and converted to a single-byte printer
//! code page right before it is sent. ESC/POS command bytes are plain ASCII
//! and pass through unchanged.

use encoding_rs::Encoding;
use tracing::instrument;

/// Printer character table
///
/// `table` is the `n` of `ESC t n` on Epson-compatible printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePage {
    pub table: u8,
    pub encoding: &'static Encoding,
}

impl CodePage {
    /// WPC1252 (Western European, includes `€`, `ü`, `ö`, `ç`)
    pub const WPC1252: CodePage = CodePage {
        table: 16,
        encoding: encoding_rs::WINDOWS_1252,
    };

    /// `ESC t n` - select character code table
    pub fn select_command(&self) -> [u8; 3] {
        [0x1B, 0x74, self.table]
    }
}

impl Default for CodePage {
    fn default() -> Self {
        Self::WPC1252
    }
}

/// Encode text into the printer code page
///
/// Characters missing from the code page become `?`, so one character
/// always occupies one printed cell.
#[instrument(skip(s), fields(len = s.len()))]
pub fn encode_text(s: &str, page: CodePage) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];

    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (bytes, _, unmappable) = page.encoding.encode(c.encode_utf8(&mut buf));
        if unmappable {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}
