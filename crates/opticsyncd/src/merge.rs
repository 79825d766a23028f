//! Metadata fusion engine.
//!
//! Joins the four independently-sourced views of a physical port into the
//! fused records, by canonical interface name, under a strict field-level
//! precedence:
//!
//! 1. per-slot detail (highest) — overwrites any field it supplies;
//! 2. chassis-inventory description parsing — kept where the slot detail is
//!    silent;
//! 3. diagnostics-native fields (lowest) — diagnostics never originates
//!    vendor/part/serial metadata, only measurements.
//!
//! Device identity fields come from a single source and are copied onto
//! every record unconditionally. Slot-level metadata is looked up by the
//! *parent* canonical name (channel suffix stripped): a transceiver is
//! shared by all channels of its port. FEC statistics are per channel and
//! join on the full canonical name.
//!
//! Fusion is idempotent and side-effect-free: fusing the same inputs twice
//! produces byte-identical output.

use std::collections::BTreeMap;

use optics_common::{canonical_name, canonicalize};

use crate::chassis_inventory::ChassisInventory;
use crate::interface_statistics::{FecReport, FecStatistics};
use crate::pic_detail::PicTransceiver;
use crate::records::OpticsReport;
use crate::system_information::SystemInformation;

/// Overwrite `$field` on `$target` when the source supplies a value.
macro_rules! merge_field {
    ($target:expr, $source:expr, $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field.clone();
            }
        )+
    };
}

/// Fuse identity, topology, slot-detail, and statistics metadata into the
/// diagnostics report.
///
/// `slot_detail` may be empty when no per-slot documents were collected;
/// `fec` is optional for the same reason. Consumes and returns the report.
pub fn merge_metadata(
    system: &SystemInformation,
    chassis: &ChassisInventory,
    slot_detail: &BTreeMap<String, PicTransceiver>,
    fec: Option<&FecReport>,
    mut report: OpticsReport,
) -> OpticsReport {
    let fec_by_name: BTreeMap<String, &FecStatistics> = fec
        .map(|report| {
            report
                .interfaces
                .iter()
                .map(|stats| (canonical_name(&stats.if_name), stats))
                .collect()
        })
        .unwrap_or_default();

    for interface in &mut report.interfaces {
        let (parent, _) = canonicalize(&interface.if_name);

        // Device identity: single source, copied unconditionally.
        merge_field!(interface, system, origin_hostname, device_profile);
        if chassis.origin_name.is_some() {
            interface.origin_name = chassis.origin_name.clone();
        }

        // Chassis-derived metadata first, slot detail overrides.
        if let Some(xcvr) = chassis.transceivers.get(&parent) {
            merge_field!(
                interface, xcvr, vendor, part_number, serial_number, media_type, fiber_type,
            );
        }
        if let Some(xcvr) = slot_detail.get(&parent) {
            merge_field!(
                interface,
                xcvr,
                vendor,
                part_number,
                cable_type,
                media_type,
                wavelength,
                fiber_type,
                firmware_version,
                vendor_rev,
            );
        }

        // FEC statistics join per channel, not per parent.
        if let Some(stats) = fec_by_name.get(&canonical_name(&interface.if_name)) {
            merge_field!(
                interface,
                stats,
                admin_status,
                oper_status,
                speed_bps,
                input_bps,
                input_pps,
                output_bps,
                output_pps,
                fec_ccw,
                fec_nccw,
                fec_ccw_error_rate,
                fec_nccw_error_rate,
                pre_fec_ber,
            );
            if !stats.histogram.is_empty() {
                interface.histogram = stats.histogram.clone();
            }
        }
    }

    for lane in &mut report.lanes {
        let (parent, _) = canonicalize(&lane.if_name);

        merge_field!(lane, system, origin_hostname, device_profile);
        if chassis.origin_name.is_some() {
            lane.origin_name = chassis.origin_name.clone();
        }

        if let Some(xcvr) = chassis.transceivers.get(&parent) {
            merge_field!(lane, xcvr, vendor, part_number, serial_number, media_type, fiber_type);
        }
        if let Some(xcvr) = slot_detail.get(&parent) {
            merge_field!(
                lane,
                xcvr,
                vendor,
                part_number,
                cable_type,
                media_type,
                wavelength,
                fiber_type,
                firmware_version,
                vendor_rev,
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chassis_inventory::ChassisTransceiver;
    use crate::records::{InterfaceRecord, LaneRecord};
    use optics_common::FiberType;
    use pretty_assertions::assert_eq;

    fn system() -> SystemInformation {
        SystemInformation {
            device: "10.0.0.1".to_string(),
            origin_hostname: Some("lab-spine-01".to_string()),
            hardware_model: Some("qfx5240-64od".to_string()),
            os_name: Some("junos".to_string()),
            os_version: Some("22.1R1.10".to_string()),
            device_profile: Some("Juniper_qfx5240-64od".to_string()),
        }
    }

    fn chassis() -> ChassisInventory {
        let mut inv = ChassisInventory {
            device: "10.0.0.1".to_string(),
            origin_name: Some("CH0213490123".to_string()),
            transceivers: BTreeMap::new(),
        };
        inv.transceivers.insert(
            "et-0/0/6".to_string(),
            ChassisTransceiver {
                vendor: Some("VendorA".to_string()),
                part_number: Some("740-061405".to_string()),
                serial_number: Some("1ACP13090SX".to_string()),
                description: Some("VendorA QSFP-100G-SR4".to_string()),
                media_type: Some("QSFP-100G-SR4".to_string()),
                fiber_type: Some(FiberType::MultiMode),
            },
        );
        inv
    }

    fn slot_detail() -> BTreeMap<String, PicTransceiver> {
        let mut detail = BTreeMap::new();
        detail.insert(
            "et-0/0/6".to_string(),
            PicTransceiver {
                vendor: Some("VendorB".to_string()),
                part_number: None,
                cable_type: Some("100GBASE SR4".to_string()),
                media_type: Some("100GBASE SR4".to_string()),
                wavelength: Some("850 nm".to_string()),
                fiber_type: None,
                firmware_version: Some("3.1".to_string()),
                vendor_rev: None,
            },
        );
        detail
    }

    fn report() -> OpticsReport {
        OpticsReport {
            interfaces: vec![InterfaceRecord::new("et-0/0/6", "10.0.0.1", 100)],
            lanes: vec![LaneRecord::new("et-0/0/6", "10.0.0.1", 0, 100)],
        }
    }

    #[test]
    fn test_slot_detail_overrides_chassis() {
        let fused = merge_metadata(&system(), &chassis(), &slot_detail(), None, report());
        let rec = &fused.interfaces[0];
        // Slot detail supplies vendor -> it wins.
        assert_eq!(rec.vendor, Some("VendorB".to_string()));
        // Slot detail silent on part number and serial -> chassis kept.
        assert_eq!(rec.part_number, Some("740-061405".to_string()));
        assert_eq!(rec.serial_number, Some("1ACP13090SX".to_string()));
        // Slot detail silent on fiber type -> chassis classification kept.
        assert_eq!(rec.fiber_type, Some(FiberType::MultiMode));
        assert_eq!(rec.wavelength, Some("850 nm".to_string()));
        assert_eq!(rec.firmware_version, Some("3.1".to_string()));
    }

    #[test]
    fn test_device_identity_on_every_record() {
        let fused = merge_metadata(&system(), &chassis(), &slot_detail(), None, report());
        for (hostname, profile, serial) in fused
            .interfaces
            .iter()
            .map(|r| (&r.origin_hostname, &r.device_profile, &r.origin_name))
            .chain(
                fused
                    .lanes
                    .iter()
                    .map(|l| (&l.origin_hostname, &l.device_profile, &l.origin_name)),
            )
        {
            assert_eq!(hostname.as_deref(), Some("lab-spine-01"));
            assert_eq!(profile.as_deref(), Some("Juniper_qfx5240-64od"));
            assert_eq!(serial.as_deref(), Some("CH0213490123"));
        }
    }

    #[test]
    fn test_channelized_interface_joins_on_parent() {
        let mut input = report();
        input.interfaces[0].if_name = "et-0/0/6:2".to_string();
        input.lanes[0].if_name = "xe-0/0/6:2".to_string();

        let fused = merge_metadata(&system(), &chassis(), &slot_detail(), None, input);
        assert_eq!(fused.interfaces[0].vendor, Some("VendorB".to_string()));
        assert_eq!(fused.lanes[0].vendor, Some("VendorB".to_string()));
    }

    #[test]
    fn test_no_slot_detail_keeps_chassis_values() {
        let fused = merge_metadata(&system(), &chassis(), &BTreeMap::new(), None, report());
        assert_eq!(fused.interfaces[0].vendor, Some("VendorA".to_string()));
        assert_eq!(fused.interfaces[0].cable_type, None);
    }

    #[test]
    fn test_fec_statistics_joined_per_channel() {
        let fec = FecReport {
            interfaces: vec![
                FecStatistics {
                    if_name: "et-0/0/6".to_string(),
                    device: "10.0.0.1".to_string(),
                    fec_ccw: Some(100.0),
                    fec_nccw: Some(3.0),
                    ..Default::default()
                },
                FecStatistics {
                    // Legacy spelling joins onto the canonical record.
                    if_name: "xe-0/0/7:1".to_string(),
                    device: "10.0.0.1".to_string(),
                    fec_ccw: Some(7.0),
                    ..Default::default()
                },
            ],
        };

        let mut input = report();
        input
            .interfaces
            .push(InterfaceRecord::new("et-0/0/7:1", "10.0.0.1", 100));

        let fused = merge_metadata(&system(), &chassis(), &BTreeMap::new(), Some(&fec), input);
        assert_eq!(fused.interfaces[0].fec_ccw, Some(100.0));
        assert_eq!(fused.interfaces[0].fec_nccw, Some(3.0));
        assert_eq!(fused.interfaces[1].fec_ccw, Some(7.0));
    }

    #[test]
    fn test_fusion_is_idempotent() {
        let once = merge_metadata(&system(), &chassis(), &slot_detail(), None, report());
        let twice = merge_metadata(&system(), &chassis(), &slot_detail(), None, once.clone());
        assert_eq!(once, twice);
        let json_once = serde_json::to_string(&once).unwrap();
        let json_twice = serde_json::to_string(&twice).unwrap();
        assert_eq!(json_once, json_twice);
    }

    #[test]
    fn test_unknown_interface_left_unmerged() {
        let mut input = report();
        input.interfaces[0].if_name = "et-9/9/9".to_string();
        let fused = merge_metadata(&system(), &chassis(), &slot_detail(), None, input);
        let rec = &fused.interfaces[0];
        assert_eq!(rec.vendor, None);
        // Identity still applies: it comes from the device, not the port.
        assert_eq!(rec.origin_hostname, Some("lab-spine-01".to_string()));
    }
}
