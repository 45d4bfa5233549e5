//! Diagnostic listing of attached USB devices
//!
//! Helps find the VID/PID pair for a `usb://` stream target.

use kermes_printer::{PrintResult, UsbDeviceInfo, UsbEnumerator};
use std::io::Write;

pub fn describe(dev: &UsbDeviceInfo) -> String {
    // Both strings fall back together, as with a failed descriptor read
    let (manufacturer, product) = match (&dev.manufacturer, &dev.product) {
        (Some(m), Some(p)) => (m.as_str(), p.as_str()),
        _ => ("Unknown", "Unknown"),
    };
    format!(
        "VID: {:#x}, PID: {:#x}, Manufacturer: {}, Product: {}",
        dev.vendor_id, dev.product_id, manufacturer, product
    )
}

/// Write one line per attached device; returns the device count
pub fn list_usb_devices(enumerator: &impl UsbEnumerator, out: &mut impl Write) -> PrintResult<usize> {
    let devices = enumerator.devices()?;
    for dev in &devices {
        writeln!(out, "{}", describe(dev))?;
    }
    Ok(devices.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<UsbDeviceInfo>);

    impl UsbEnumerator for Fixed {
        fn devices(&self) -> PrintResult<Vec<UsbDeviceInfo>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_describe_device() {
        let dev = UsbDeviceInfo {
            vendor_id: 0x0519,
            product_id: 0x2013,
            manufacturer: Some("Star Micronics".to_string()),
            product: Some("TSP143IIIU".to_string()),
        };
        assert_eq!(
            describe(&dev),
            "VID: 0x519, PID: 0x2013, Manufacturer: Star Micronics, Product: TSP143IIIU"
        );
    }

    #[test]
    fn test_unreadable_strings_are_unknown() {
        let dev = UsbDeviceInfo {
            vendor_id: 0x04b8,
            product_id: 0x0202,
            manufacturer: Some("EPSON".to_string()),
            product: None,
        };
        assert_eq!(
            describe(&dev),
            "VID: 0x4b8, PID: 0x202, Manufacturer: Unknown, Product: Unknown"
        );
    }

    #[test]
    fn test_list_writes_one_line_per_device() {
        let e = Fixed(vec![
            UsbDeviceInfo {
                vendor_id: 1,
                product_id: 2,
                manufacturer: None,
                product: None,
            },
            UsbDeviceInfo {
                vendor_id: 3,
                product_id: 4,
                manufacturer: Some("A".to_string()),
                product: Some("B".to_string()),
            },
        ]);
        let mut out = Vec::new();

        assert_eq!(list_usb_devices(&e, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("Manufacturer: A, Product: B\n"));
    }
}
