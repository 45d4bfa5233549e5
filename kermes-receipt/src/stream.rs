//! Command stream for ESC/POS thermal printers
//!
//! Every item is printed as its own ticket (header, item, cut) so it can be
//! handed over at the counter; the total follows on a final ticket.

use crate::cart::Cart;
use crate::layout::{SEPARATOR, format_timestamp};
use crate::price::format_plain;
use chrono::NaiveDateTime;
use kermes_printer::{Alignment, CodePage, EscPosBuilder};

/// Lines fed before each cut so the last line clears the cutter
const CUT_FEED_LINES: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandToken {
    SetAlignment { align: Alignment, scale: u8 },
    EmitText(String),
    Cut,
}

struct Tokens(Vec<CommandToken>);

impl Tokens {
    fn align(&mut self, align: Alignment, scale: u8) {
        self.0.push(CommandToken::SetAlignment { align, scale });
    }

    fn line(&mut self, s: impl Into<String>) {
        let mut s = s.into();
        s.push('\n');
        self.0.push(CommandToken::EmitText(s));
    }

    fn cut(&mut self) {
        self.0.push(CommandToken::Cut);
    }
}

/// Lay out a cart as an ESC/POS token stream
pub fn render_stream(name: &str, cart: &Cart, now: NaiveDateTime) -> Vec<CommandToken> {
    let date = format_timestamp(now);
    let mut t = Tokens(Vec::with_capacity(cart.items.len() * 11 + 5));

    for item in &cart.items {
        t.align(Alignment::Center, 2);
        t.line(name);
        t.align(Alignment::Left, 1);
        t.line(format!("Tarih: {}", date));
        t.line(SEPARATOR);
        t.line(format!("Ürün: {}", item.name));
        t.line(format!("Adet: {}", item.quantity));
        t.line(format!("Fiyat: {} €", format_plain(item.price)));
        t.line(SEPARATOR);
        t.cut();
    }

    t.align(Alignment::Left, 1);
    t.line(format!("Toplam: {} €", format_plain(cart.total)));
    t.line("Teşekkürler!");
    t.cut();

    t.0
}

/// Encode tokens into printer bytes
pub fn encode_stream(tokens: &[CommandToken], page: CodePage) -> Vec<u8> {
    let mut b = EscPosBuilder::new(page);
    for token in tokens {
        match token {
            CommandToken::SetAlignment { align, scale } => {
                b.align(*align).scale(*scale);
            }
            CommandToken::EmitText(text) => {
                b.text(text);
            }
            CommandToken::Cut => {
                b.cut_feed(CUT_FEED_LINES);
            }
        }
    }
    b.build()
}
