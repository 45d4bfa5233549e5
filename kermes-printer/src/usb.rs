//! USB device discovery and bulk-transfer printing
//!
//! Enumeration and the bulk printer are backed by libusb through `rusb`
//! when the `usb` feature is enabled. Without it they report
//! [`PrintError::NotSupported`].

use crate::error::{PrintError, PrintResult};

/// Descriptor summary of an attached USB device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    /// `None` when the descriptor string could not be read
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

/// Source of attached USB devices
pub trait UsbEnumerator {
    fn devices(&self) -> PrintResult<Vec<UsbDeviceInfo>>;
}

/// Enumerates devices on the default libusb context
#[derive(Debug, Clone, Copy, Default)]
pub struct LibUsbEnumerator;

#[cfg(feature = "usb")]
impl UsbEnumerator for LibUsbEnumerator {
    fn devices(&self) -> PrintResult<Vec<UsbDeviceInfo>> {
        let mut out = Vec::new();

        for device in rusb::devices()?.iter() {
            let desc = match device.device_descriptor() {
                Ok(d) => d,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping device without descriptor");
                    continue;
                }
            };

            // Descriptor strings need an open handle; permission errors are common
            let (manufacturer, product) = match device.open() {
                Ok(handle) => (
                    handle.read_manufacturer_string_ascii(&desc).ok(),
                    handle.read_product_string_ascii(&desc).ok(),
                ),
                Err(e) => {
                    tracing::debug!(
                        vid = desc.vendor_id(),
                        pid = desc.product_id(),
                        error = %e,
                        "cannot open device for descriptor strings"
                    );
                    (None, None)
                }
            };

            out.push(UsbDeviceInfo {
                vendor_id: desc.vendor_id(),
                product_id: desc.product_id(),
                manufacturer,
                product,
            });
        }

        Ok(out)
    }
}

#[cfg(not(feature = "usb"))]
impl UsbEnumerator for LibUsbEnumerator {
    fn devices(&self) -> PrintResult<Vec<UsbDeviceInfo>> {
        Err(PrintError::NotSupported(
            "built without the `usb` feature".to_string(),
        ))
    }
}

/// Thermal printer on a USB bulk endpoint
///
/// Defaults match the Star TSP100 in ESC/POS mode: interface 0, OUT
/// endpoint `0x02`.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "usb"), allow(dead_code))]
pub struct UsbPrinter {
    vendor_id: u16,
    product_id: u16,
    interface: u8,
    out_endpoint: u8,
    timeout: std::time::Duration,
}

impl UsbPrinter {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            interface: 0,
            out_endpoint: 0x02,
            timeout: std::time::Duration::from_secs(5),
        }
    }

    /// Parse `VID:PID` in hex, e.g. `0519:2013` or `0x0519:0x2013`
    pub fn from_ids(ids: &str) -> PrintResult<Self> {
        let invalid = || PrintError::InvalidConfig(format!("Invalid USB ids: {}", ids));
        let (vid, pid) = ids.split_once(':').ok_or_else(invalid)?;
        let parse = |s: &str| {
            let s = s.trim();
            let s = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s);
            u16::from_str_radix(s, 16).map_err(|_| invalid())
        };
        Ok(Self::new(parse(vid)?, parse(pid)?))
    }

    pub fn ids(&self) -> (u16, u16) {
        (self.vendor_id, self.product_id)
    }
}

#[cfg(feature = "usb")]
impl crate::printer::Printer for UsbPrinter {
    #[tracing::instrument(skip(data), fields(vid = self.vendor_id, pid = self.product_id, data_len = data.len()))]
    fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut handle = rusb::open_device_with_vid_pid(self.vendor_id, self.product_id)
            .ok_or_else(|| {
                PrintError::Offline(format!(
                    "USB device {:04x}:{:04x} not found",
                    self.vendor_id, self.product_id
                ))
            })?;

        // Not supported on every platform; claiming still works where it fails
        let _ = handle.set_auto_detach_kernel_driver(true);
        handle.claim_interface(self.interface)?;

        let mut sent = 0;
        let result = loop {
            if sent == data.len() {
                break Ok(());
            }
            match handle.write_bulk(self.out_endpoint, &data[sent..], self.timeout) {
                Ok(0) => break Err(PrintError::Usb("bulk write stalled".to_string())),
                Ok(n) => sent += n,
                Err(rusb::Error::Timeout) => {
                    break Err(PrintError::Timeout(format!(
                        "USB write after {} of {} bytes",
                        sent,
                        data.len()
                    )));
                }
                Err(e) => break Err(e.into()),
            }
        };

        let _ = handle.release_interface(self.interface);
        if result.is_ok() {
            tracing::info!("USB print data sent");
        }
        result
    }
}

#[cfg(not(feature = "usb"))]
impl crate::printer::Printer for UsbPrinter {
    fn print(&self, _data: &[u8]) -> PrintResult<()> {
        Err(PrintError::NotSupported(
            "built without the `usb` feature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usb_ids_parse() {
        let p = UsbPrinter::from_ids("0519:2013").unwrap();
        assert_eq!(p.ids(), (0x0519, 0x2013));

        let p = UsbPrinter::from_ids("0x04b8:0x0202").unwrap();
        assert_eq!(p.ids(), (0x04B8, 0x0202));
    }

    #[test]
    fn test_usb_ids_invalid() {
        assert!(UsbPrinter::from_ids("0519").is_err());
        assert!(UsbPrinter::from_ids("zzzz:0001").is_err());
    }
}
