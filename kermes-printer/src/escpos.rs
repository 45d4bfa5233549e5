//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::{CodePage, encode_text};

/// Horizontal text alignment (`ESC a n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    fn code(self) -> u8 {
        match self {
            Alignment::Left => 0x00,
            Alignment::Center => 0x01,
            Alignment::Right => 0x02,
        }
    }
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers.
/// Text is encoded into the selected code page as it is written.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    page: CodePage,
}

impl EscPosBuilder {
    /// Start a job: printer reset, then code page selection
    pub fn new(page: CodePage) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        buf.extend_from_slice(&page.select_command());
        Self { buf, page }
    }

    // === Text Output ===

    /// Write text (encoded into the builder's code page)
    pub fn text(&mut self, s: &str) -> &mut Self {
        let encoded = encode_text(s, self.page);
        self.buf.extend_from_slice(&encoded);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    // === Alignment ===

    pub fn align(&mut self, align: Alignment) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, align.code()]);
        self
    }

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.align(Alignment::Center)
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.align(Alignment::Left)
    }

    // === Text Size ===

    /// Character magnification, same factor for width and height
    ///
    /// `GS ! n` takes the width factor in the high nibble and the height
    /// factor in the low nibble, both stored as `factor - 1` (max 8).
    pub fn scale(&mut self, factor: u8) -> &mut Self {
        let f = factor.clamp(1, 8) - 1;
        self.buf.extend_from_slice(&[0x1D, 0x21, (f << 4) | f]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.scale(1)
    }

    // === Paper Control ===

    /// Feed n lines, then full cut
    ///
    /// GS V 66 n lets the printer account for the cutter-to-head distance.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n - Full cut after feeding n lines
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Build ===

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(CodePage::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: [u8; 5] = [0x1B, 0x40, 0x1B, 0x74, 16];

    #[test]
    fn test_builder_preamble() {
        let data = EscPosBuilder::default().build();
        assert_eq!(data, PREAMBLE);
    }

    #[test]
    fn test_builder_basic() {
        let mut b = EscPosBuilder::new(CodePage::WPC1252);
        b.center().scale(2).line("Kermes").reset_size().left().line("Adet: 1");

        let data = b.build();
        let body = &data[PREAMBLE.len()..];
        assert_eq!(&body[..3], &[0x1B, 0x61, 0x01]);
        assert_eq!(&body[3..6], &[0x1D, 0x21, 0x11]);
        assert_eq!(&body[6..13], b"Kermes\n");
        assert_eq!(&body[13..16], &[0x1D, 0x21, 0x00]);
        assert_eq!(&body[16..19], &[0x1B, 0x61, 0x00]);
        assert_eq!(&body[19..], b"Adet: 1\n");
    }

    #[test]
    fn test_text_is_encoded() {
        let mut b = EscPosBuilder::new(CodePage::WPC1252);
        b.text("5,00 €");
        let data = b.build();
        assert_eq!(data.last(), Some(&0x80));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut b = EscPosBuilder::new(CodePage::WPC1252);
        b.scale(0).scale(20);
        let data = b.build();
        assert_eq!(&data[PREAMBLE.len()..], &[0x1D, 0x21, 0x00, 0x1D, 0x21, 0x77]);
    }

    #[test]
    fn test_cut_feed() {
        let mut b = EscPosBuilder::new(CodePage::WPC1252);
        b.cut_feed(3);
        assert_eq!(&b.build()[PREAMBLE.len()..], &[0x1D, 0x56, 0x42, 3]);
    }
}
