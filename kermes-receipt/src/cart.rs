//! Cart model sent by the POS on stdin

use crate::error::ReceiptResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
    /// Line amount as sent by the POS; never multiplied by `quantity`
    pub price: Decimal,
}

/// Cart record: items in POS order plus the total computed by the POS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<Item>,
    pub total: Decimal,
}

impl Cart {
    /// Read a cart from a JSON document
    pub fn from_reader(reader: impl Read) -> ReceiptResult<Self> {
        let cart: Cart = serde_json::from_reader(reader)?;
        tracing::debug!(items = cart.items.len(), total = %cart.total, "cart parsed");
        Ok(cart)
    }
}
