//! Page layout for GDI printers
//!
//! The receipt is laid out as positioned text on a single page. Columns are
//! fixed device-pixel offsets; text is never measured or wrapped, so a long
//! item name can run into the quantity column.

use crate::cart::Cart;
use crate::price::format_european;
use chrono::NaiveDateTime;
use kermes_printer::FontSpec;

/// Distance between two rows
pub const LINE_HEIGHT: i32 = 40;
/// Left margin for every row
pub const X_LEFT: i32 = 100;
/// Quantity column, on the same row as the price
pub const X_QUANTITY: i32 = X_LEFT + 300;

pub const SEPARATOR: &str = "--------------------------";
pub const CLOSING_LINE: &str = "Teşekkürler! / Vielen Dank!";

const FONT_FACE: &str = "Arial";

/// Fonts used on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageFont {
    HeaderBold,
    BodyNormal,
    ItemNameBold,
    ItemPriceNormal,
    ItemQtyBold,
}

impl PageFont {
    pub fn spec(self) -> FontSpec {
        let (height, weight) = match self {
            PageFont::HeaderBold => (48, 800),
            PageFont::BodyNormal => (24, 400),
            PageFont::ItemNameBold => (36, 700),
            PageFont::ItemPriceNormal => (24, 400),
            PageFont::ItemQtyBold => (24, 700),
        };
        FontSpec {
            face: FONT_FACE,
            height,
            weight,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageFont::HeaderBold => "header-bold",
            PageFont::BodyNormal => "body-normal",
            PageFont::ItemNameBold => "item-name-bold",
            PageFont::ItemPriceNormal => "item-price-normal",
            PageFont::ItemQtyBold => "item-qty-bold",
        }
    }
}

/// Text drawn at a fixed position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawText {
    pub x: i32,
    pub y: i32,
    pub font: PageFont,
    pub text: String,
}

/// One document holding one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Spooler document title
    pub title: String,
    pub instructions: Vec<DrawText>,
}

/// `DD.MM.YYYY HH:MM`
pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format("%d.%m.%Y %H:%M").to_string()
}

struct Cursor {
    y: i32,
    out: Vec<DrawText>,
}

impl Cursor {
    fn draw(&mut self, x: i32, font: PageFont, text: String) {
        self.out.push(DrawText {
            x,
            y: self.y,
            font,
            text,
        });
    }

    fn advance(&mut self) {
        self.y += LINE_HEIGHT;
    }
}

/// Lay out a cart as a single page
pub fn render_page(name: &str, cart: &Cart, now: NaiveDateTime) -> PageLayout {
    let mut c = Cursor {
        y: 0,
        out: Vec::with_capacity(5 + cart.items.len() * 3),
    };

    // Header
    c.draw(X_LEFT, PageFont::HeaderBold, name.to_string());
    c.advance();
    c.draw(
        X_LEFT,
        PageFont::BodyNormal,
        format!("Tarih: {}", format_timestamp(now)),
    );
    c.advance();
    c.draw(X_LEFT, PageFont::BodyNormal, SEPARATOR.to_string());
    c.advance();

    for item in &cart.items {
        c.draw(X_LEFT, PageFont::ItemNameBold, format!("Ürün: {}", item.name));
        c.advance();
        c.draw(
            X_LEFT,
            PageFont::ItemPriceNormal,
            format!("Fiyat: {} €", format_european(item.price)),
        );
        c.draw(
            X_QUANTITY,
            PageFont::ItemQtyBold,
            format!("Adet: {}", item.quantity),
        );
        c.advance();
    }

    c.draw(
        X_LEFT,
        PageFont::BodyNormal,
        format!("Toplam: {} €", format_european(cart.total)),
    );
    c.advance();
    c.draw(X_LEFT, PageFont::BodyNormal, CLOSING_LINE.to_string());
    c.advance();

    PageLayout {
        title: format!("{} Fişi", name),
        instructions: c.out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Item;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_header_block() {
        let cart = Cart {
            items: vec![],
            total: Decimal::ZERO,
        };
        let page = render_page("Münih Fatih Kermes", &cart, now());

        assert_eq!(page.title, "Münih Fatih Kermes Fişi");
        let first = &page.instructions[0];
        assert_eq!((first.x, first.y), (X_LEFT, 0));
        assert_eq!(first.font, PageFont::HeaderBold);
        assert_eq!(first.text, "Münih Fatih Kermes");
        assert_eq!(page.instructions[1].text, "Tarih: 01.06.2024 14:05");
        assert_eq!(page.instructions[1].y, LINE_HEIGHT);
        assert_eq!(page.instructions[2].text, SEPARATOR);
        assert_eq!(page.instructions[2].y, 2 * LINE_HEIGHT);
    }

    #[test]
    fn test_price_and_quantity_share_a_row() {
        let cart = Cart {
            items: vec![Item {
                name: "Lahmacun".to_string(),
                quantity: 3,
                price: Decimal::new(12345, 1),
            }],
            total: Decimal::new(12345, 1),
        };
        let page = render_page("K", &cart, now());

        let name = &page.instructions[3];
        let price = &page.instructions[4];
        let qty = &page.instructions[5];
        assert_eq!(name.text, "Ürün: Lahmacun");
        assert_eq!(name.font, PageFont::ItemNameBold);
        assert_eq!(price.text, "Fiyat: 1.234,50 €");
        assert_eq!(price.font, PageFont::ItemPriceNormal);
        assert_eq!(qty.text, "Adet: 3");
        assert_eq!(qty.font, PageFont::ItemQtyBold);
        assert_eq!(price.y, name.y + LINE_HEIGHT);
        assert_eq!(qty.y, price.y);
        assert_eq!(qty.x, X_QUANTITY);
    }

    #[test]
    fn test_font_specs() {
        assert_eq!(PageFont::HeaderBold.spec().weight, 800);
        assert_eq!(PageFont::ItemNameBold.spec().height, 36);
        assert_eq!(PageFont::BodyNormal.spec(), PageFont::ItemPriceNormal.spec());
        assert_eq!(PageFont::ItemQtyBold.spec().weight, 700);
    }
}
