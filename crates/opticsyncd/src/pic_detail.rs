//! Per-slot transceiver detail extractor.
//!
//! Walks a per-slot diagnostic document (one per populated FPC/PIC pair)
//! and produces the rich transceiver attributes the chassis inventory lacks:
//! structured vendor name and part number, cable type, wavelength, fiber
//! mode, and firmware versions. This is the highest-precedence metadata
//! source during fusion.

use roxmltree::Document;
use std::collections::BTreeMap;

use optics_common::{
    canonicalize, child_text, clean_field, clean_firmware, fiber::fiber_mode, find_descendants,
    FiberType, PrefixTable,
};

use crate::error::Result;

/// Detailed transceiver attributes for one port.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PicTransceiver {
    pub vendor: Option<String>,
    pub part_number: Option<String>,
    pub cable_type: Option<String>,
    pub media_type: Option<String>,
    pub wavelength: Option<String>,
    pub fiber_type: Option<FiberType>,
    pub firmware_version: Option<String>,
    /// Vendor hardware revision tag.
    pub vendor_rev: Option<String>,
}

impl PicTransceiver {
    /// True when the port reported no usable metadata at all (empty cage,
    /// or a module that answers every field with a sentinel).
    pub fn is_empty(&self) -> bool {
        self.vendor.is_none()
            && self.part_number.is_none()
            && self.cable_type.is_none()
            && self.media_type.is_none()
            && self.wavelength.is_none()
            && self.fiber_type.is_none()
            && self.firmware_version.is_none()
            && self.vendor_rev.is_none()
    }
}

/// Per-slot detail extract, keyed by canonical parent interface name.
#[derive(Debug, Clone, Default)]
pub struct PicDetail {
    pub device: String,
    pub fpc: u32,
    pub pic: u32,
    pub transceivers: BTreeMap<String, PicTransceiver>,
}

/// Parse a per-slot detail document for the given slot coordinates.
///
/// Ports whose every field is an unpopulated sentinel are dropped. Malformed
/// documents are an error for the whole slot.
pub fn parse_pic_detail(
    xml: &str,
    device: &str,
    fpc: u32,
    pic: u32,
    platform_hint: Option<&str>,
    prefixes: &PrefixTable,
) -> Result<PicDetail> {
    let doc = Document::parse(xml)?;

    let mut detail = PicDetail {
        device: device.to_string(),
        fpc,
        pic,
        transceivers: BTreeMap::new(),
    };

    for port_elem in find_descendants(doc.root_element(), "port") {
        let port: u32 = match child_text(port_elem, "port-number").and_then(|t| t.parse().ok()) {
            Some(n) => n,
            None => continue,
        };

        let resolved = prefixes.resolve(fpc, pic, port, platform_hint);
        let (if_name, _) = canonicalize(&resolved);

        let cable_type = clean_field(child_text(port_elem, "cable-type"));
        let transceiver = PicTransceiver {
            vendor: clean_field(child_text(port_elem, "sfp-vendor-name")),
            part_number: clean_field(child_text(port_elem, "sfp-vendor-pno")),
            // Cable type doubles as media type for fiber classification
            // downstream.
            media_type: cable_type.clone(),
            cable_type,
            wavelength: clean_field(child_text(port_elem, "wavelength")),
            fiber_type: fiber_mode(child_text(port_elem, "fiber-mode")),
            firmware_version: clean_firmware(child_text(port_elem, "sfp-vendor-fw-ver")),
            vendor_rev: clean_field(child_text(port_elem, "sfp-jnpr-ver")),
        };

        if !transceiver.is_empty() {
            detail.transceivers.insert(if_name, transceiver);
        }
    }

    Ok(detail)
}

/// Combine per-slot extracts from several slots into one lookup map.
///
/// Slot coordinates never overlap, so insertion order does not matter.
pub fn combine(details: impl IntoIterator<Item = PicDetail>) -> BTreeMap<String, PicTransceiver> {
    let mut combined = BTreeMap::new();
    for detail in details {
        combined.extend(detail.transceivers);
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PIC_XML: &str = r#"
        <rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
          <fpc-information xmlns="http://xml.example.net/device/22.1R1/chassis">
            <fpc>
              <pic-detail>
                <slot>0</slot>
                <pic-slot>0</pic-slot>
                <port-information>
                  <port>
                    <port-number>6</port-number>
                    <cable-type>100GBASE SR4</cable-type>
                    <fiber-mode>MM</fiber-mode>
                    <sfp-vendor-name>ACME PHOTONICS</sfp-vendor-name>
                    <sfp-vendor-pno>APX-100G-SR4</sfp-vendor-pno>
                    <wavelength>850 nm</wavelength>
                    <sfp-vendor-fw-ver>3.1</sfp-vendor-fw-ver>
                    <sfp-jnpr-ver>REV 01</sfp-jnpr-ver>
                  </port>
                  <port>
                    <port-number>7</port-number>
                    <cable-type>n/a</cable-type>
                    <fiber-mode>n/a</fiber-mode>
                    <sfp-vendor-name>n/a</sfp-vendor-name>
                    <sfp-vendor-pno>none</sfp-vendor-pno>
                    <wavelength></wavelength>
                    <sfp-vendor-fw-ver>0.0</sfp-vendor-fw-ver>
                  </port>
                  <port>
                    <port-number>8</port-number>
                    <cable-type>10GBASE LR</cable-type>
                    <fiber-mode>Single Mode</fiber-mode>
                    <sfp-vendor-name>ACME PHOTONICS</sfp-vendor-name>
                    <sfp-vendor-pno>APX-10G-LR</sfp-vendor-pno>
                    <wavelength>1310 nm</wavelength>
                    <sfp-vendor-fw-ver>0.0</sfp-vendor-fw-ver>
                  </port>
                </port-information>
              </pic-detail>
            </fpc>
          </fpc-information>
        </rpc-reply>"#;

    fn parse() -> PicDetail {
        parse_pic_detail(PIC_XML, "switch1", 0, 0, None, &PrefixTable::default()).unwrap()
    }

    #[test]
    fn test_detail_fields_extracted() {
        let detail = parse();
        let xcvr = &detail.transceivers["et-0/0/6"];
        assert_eq!(xcvr.vendor, Some("ACME PHOTONICS".to_string()));
        assert_eq!(xcvr.part_number, Some("APX-100G-SR4".to_string()));
        assert_eq!(xcvr.cable_type, Some("100GBASE SR4".to_string()));
        assert_eq!(xcvr.media_type, Some("100GBASE SR4".to_string()));
        assert_eq!(xcvr.wavelength, Some("850 nm".to_string()));
        assert_eq!(xcvr.fiber_type, Some(FiberType::MultiMode));
        assert_eq!(xcvr.firmware_version, Some("3.1".to_string()));
        assert_eq!(xcvr.vendor_rev, Some("REV 01".to_string()));
    }

    #[test]
    fn test_all_sentinel_port_dropped() {
        let detail = parse();
        assert!(!detail.transceivers.contains_key("et-0/0/7"));
        assert_eq!(detail.transceivers.len(), 2);
    }

    #[test]
    fn test_firmware_zero_sentinel() {
        let detail = parse();
        let xcvr = &detail.transceivers["et-0/0/8"];
        assert_eq!(xcvr.firmware_version, None);
        assert_eq!(xcvr.fiber_type, Some(FiberType::SingleMode));
    }

    #[test]
    fn test_slot_coordinates_carried() {
        let detail = parse();
        assert_eq!((detail.fpc, detail.pic), (0, 0));
        assert_eq!(detail.device, "switch1");
    }

    #[test]
    fn test_malformed_document_is_error() {
        assert!(parse_pic_detail("<broken", "switch1", 0, 0, None, &PrefixTable::default()).is_err());
    }

    #[test]
    fn test_combine_slots() {
        let mut a = PicDetail {
            device: "switch1".to_string(),
            fpc: 0,
            pic: 0,
            transceivers: BTreeMap::new(),
        };
        a.transceivers.insert(
            "et-0/0/6".to_string(),
            PicTransceiver {
                vendor: Some("A".to_string()),
                ..Default::default()
            },
        );
        let mut b = PicDetail {
            device: "switch1".to_string(),
            fpc: 1,
            pic: 0,
            transceivers: BTreeMap::new(),
        };
        b.transceivers.insert(
            "et-1/0/2".to_string(),
            PicTransceiver {
                vendor: Some("B".to_string()),
                ..Default::default()
            },
        );

        let combined = combine([a, b]);
        assert_eq!(combined.len(), 2);
        assert!(combined.contains_key("et-0/0/6"));
        assert!(combined.contains_key("et-1/0/2"));
    }
}
