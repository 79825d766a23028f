//! Chassis inventory extractor.
//!
//! Walks the chassis-inventory document's module / sub-module /
//! sub-sub-module hierarchy to produce the device serial number plus one
//! transceiver metadata entry per populated port, keyed by canonical
//! interface name. Vendor and media type are recovered from the free-text
//! transceiver description; this is the low-precedence metadata source that
//! the per-slot detail may later overwrite.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Document;
use std::collections::BTreeMap;

use optics_common::{
    canonicalize, child_text, find_children, find_descendants, slot_component, FiberClassifier,
    FiberType, PrefixTable, SlotComponent,
};

use crate::error::Result;

/// Tokens that mark a description word as a media-type designator.
const MEDIA_INDICATORS: [&str; 7] = ["BASE", "SR", "LR", "ER", "ZR", "SX", "LX"];

static SPEED_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+G").unwrap());

/// Transceiver metadata recovered from the chassis inventory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChassisTransceiver {
    pub vendor: Option<String>,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub media_type: Option<String>,
    pub fiber_type: Option<FiberType>,
}

/// Chassis topology extract: device identity plus per-port transceiver
/// metadata keyed by canonical parent interface name.
#[derive(Debug, Clone, Default)]
pub struct ChassisInventory {
    pub device: String,
    /// Device (chassis) serial number.
    pub origin_name: Option<String>,
    pub transceivers: BTreeMap<String, ChassisTransceiver>,
}

/// Parse vendor and media type out of a transceiver description.
///
/// The first token is the vendor. The media type is the first token carrying
/// a reach designator; failing that, the last token carrying a speed
/// designator (`100G`, `400G`, ...).
pub fn vendor_info(description: &str) -> (Option<String>, Option<String>) {
    let mut tokens = description.split_whitespace();
    let vendor = match tokens.next() {
        Some(first) => Some(first.to_string()),
        None => return (None, None),
    };

    let mut media_type = None;
    for token in description.split_whitespace() {
        let upper = token.to_ascii_uppercase();
        if MEDIA_INDICATORS.iter().any(|ind| upper.contains(ind)) {
            media_type = Some(token.to_string());
            break;
        }
        if SPEED_TOKEN_RE.is_match(&upper) {
            media_type = Some(token.to_string());
        }
    }

    (vendor, media_type)
}

/// Parse a chassis-inventory document.
///
/// A malformed document is an error for the whole extractor; the caller
/// decides whether to degrade to an empty inventory. Individual modules that
/// are not FPC/PIC/Xcvr slots are skipped silently (power supplies, fans,
/// routing engines).
pub fn parse_chassis_inventory(
    xml: &str,
    device: &str,
    platform_hint: Option<&str>,
    prefixes: &PrefixTable,
    classifier: &FiberClassifier,
) -> Result<ChassisInventory> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let mut inventory = ChassisInventory {
        device: device.to_string(),
        ..Default::default()
    };

    // Device serial number from the first chassis element that carries one.
    for chassis in find_descendants(root, "chassis") {
        if let Some(serial) = child_text(chassis, "serial-number") {
            inventory.origin_name = Some(serial.to_string());
            break;
        }
    }

    for fpc_elem in find_descendants(root, "chassis-module") {
        let fpc = match child_text(fpc_elem, "name").and_then(slot_component) {
            Some(SlotComponent::Fpc(n)) => n,
            _ => continue,
        };

        for pic_elem in find_children(fpc_elem, "chassis-sub-module") {
            let pic = match child_text(pic_elem, "name").and_then(slot_component) {
                Some(SlotComponent::Pic(n)) => n,
                _ => continue,
            };

            for xcvr_elem in find_children(pic_elem, "chassis-sub-sub-module") {
                let port = match child_text(xcvr_elem, "name").and_then(slot_component) {
                    Some(SlotComponent::Port(n)) => n,
                    _ => continue,
                };

                let part_number = child_text(xcvr_elem, "part-number").map(str::to_string);
                let serial_number = child_text(xcvr_elem, "serial-number").map(str::to_string);
                let description = child_text(xcvr_elem, "description").map(str::to_string);

                let (vendor, media_type) = description
                    .as_deref()
                    .map(vendor_info)
                    .unwrap_or((None, None));

                // No wavelength at this source; classify from tokens only.
                let fiber_type =
                    classifier.classify(media_type.as_deref(), description.as_deref(), None);

                let resolved = prefixes.resolve(fpc, pic, port, platform_hint);
                let (if_name, _) = canonicalize(&resolved);
                debug!(
                    "chassis: FPC {} PIC {} Xcvr {} -> {}",
                    fpc, pic, port, if_name
                );

                inventory.transceivers.insert(
                    if_name,
                    ChassisTransceiver {
                        vendor,
                        part_number,
                        serial_number,
                        description,
                        media_type,
                        fiber_type,
                    },
                );
            }
        }
    }

    Ok(inventory)
}

/// Discover populated (FPC, PIC) slot pairs from a chassis-inventory
/// document, for driving per-slot detail collection.
pub fn slot_pairs(xml: &str) -> Result<Vec<(u32, u32)>> {
    let doc = Document::parse(xml)?;
    let mut pairs = Vec::new();

    for fpc_elem in find_descendants(doc.root_element(), "chassis-module") {
        let fpc = match child_text(fpc_elem, "name").and_then(slot_component) {
            Some(SlotComponent::Fpc(n)) => n,
            _ => continue,
        };
        for pic_elem in find_children(fpc_elem, "chassis-sub-module") {
            if let Some(SlotComponent::Pic(pic)) = child_text(pic_elem, "name").and_then(slot_component)
            {
                pairs.push((fpc, pic));
            }
        }
    }

    Ok(pairs)
}
