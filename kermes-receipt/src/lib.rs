//! Kermes receipt printing
//!
//! A POS cart arrives as JSON on stdin and is printed either as a GDI page
//! ([`layout`] + [`page`]) or as an ESC/POS command stream ([`stream`]).
//! Queue clearing and USB device listing share the same entry point.
//!
//! Cart input:
//!
//! ```json
//! {"items":[{"name":"Döner","quantity":2,"price":6.5}],"total":13.0}
//! ```

pub mod app;
pub mod cart;
pub mod config;
pub mod error;
pub mod layout;
pub mod logger;
pub mod page;
pub mod price;
pub mod queue;
pub mod shutdown;
pub mod stream;
pub mod usb_list;

pub use app::{Outcome, run};
pub use cart::{Cart, Item};
pub use config::{Action, Cli, Config, Mode, StreamTarget};
pub use error::{ReceiptError, ReceiptResult};
pub use layout::{PageLayout, render_page};
pub use page::{PageReport, print_page};
pub use shutdown::Shutdown;
pub use stream::{CommandToken, encode_stream, render_stream};
