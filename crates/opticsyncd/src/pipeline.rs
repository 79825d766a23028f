//! One collection cycle, end to end.
//!
//! Parses whatever documents the caller collected, fuses them, and runs the
//! counter-delta pass. The optics-diagnostics document is the backbone and
//! is required; every other input is optional and degrades gracefully: a
//! missing or unparsable optional document is logged and the corresponding
//! metadata is simply absent from the fused records.

use log::warn;

use optics_common::{FiberClassifier, PrefixTable};

use crate::chassis_inventory::{parse_chassis_inventory, ChassisInventory};
use crate::error::Result;
use crate::interface_statistics::parse_interface_statistics;
use crate::merge::merge_metadata;
use crate::optics_diagnostics::parse_optics_diagnostics;
use crate::pic_detail::{combine, parse_pic_detail};
use crate::records::OpticsReport;
use crate::system_information::{parse_system_information, SystemInformation};
use crate::throughput::{DeltaCalculator, StateStore};

/// One per-slot detail document with its slot coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PicDocument<'a> {
    pub fpc: u32,
    pub pic: u32,
    pub xml: &'a str,
}

/// The documents collected from one device in one cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleInputs<'a> {
    pub device: &'a str,
    /// Hardware model, used to pick legacy interface prefixes.
    pub platform_hint: Option<&'a str>,
    pub system_information: Option<&'a str>,
    pub chassis_inventory: Option<&'a str>,
    pub pic_details: &'a [PicDocument<'a>],
    /// Required: the report is built from this document.
    pub optics_diagnostics: &'a str,
    pub interface_statistics: Option<&'a str>,
    /// Collection timestamp, microseconds since the epoch.
    pub timestamp_us: i64,
}

/// Run one full normalization-and-fusion cycle.
///
/// Returns the fused report with counter deltas applied. The calculator's
/// state advances even for interfaces whose deltas were not computable.
pub fn run_cycle<S: StateStore>(
    inputs: &CycleInputs<'_>,
    prefixes: &PrefixTable,
    classifier: &FiberClassifier,
    calculator: &mut DeltaCalculator<S>,
) -> Result<OpticsReport> {
    let device = inputs.device;

    let system = match inputs.system_information {
        Some(xml) => match parse_system_information(xml, device) {
            Ok(system) => system,
            Err(err) => {
                warn!("{}: system-information unusable: {}", device, err);
                SystemInformation {
                    device: device.to_string(),
                    ..Default::default()
                }
            }
        },
        None => SystemInformation {
            device: device.to_string(),
            ..Default::default()
        },
    };
    let platform_hint = inputs
        .platform_hint
        .or(system.hardware_model.as_deref());

    let chassis = match inputs.chassis_inventory {
        Some(xml) => {
            match parse_chassis_inventory(xml, device, platform_hint, prefixes, classifier) {
                Ok(chassis) => chassis,
                Err(err) => {
                    warn!("{}: chassis inventory unusable: {}", device, err);
                    ChassisInventory {
                        device: device.to_string(),
                        ..Default::default()
                    }
                }
            }
        }
        None => ChassisInventory {
            device: device.to_string(),
            ..Default::default()
        },
    };

    let mut details = Vec::with_capacity(inputs.pic_details.len());
    for doc in inputs.pic_details {
        match parse_pic_detail(doc.xml, device, doc.fpc, doc.pic, platform_hint, prefixes) {
            Ok(detail) => details.push(detail),
            Err(err) => {
                warn!(
                    "{}: slot {}/{} detail unusable: {}",
                    device, doc.fpc, doc.pic, err
                );
            }
        }
    }
    let slot_detail = combine(details);

    let fec = match inputs.interface_statistics {
        Some(xml) => {
            match parse_interface_statistics(xml, device, inputs.timestamp_us, None) {
                Ok(report) => Some(report),
                Err(err) => {
                    warn!("{}: interface statistics unusable: {}", device, err);
                    None
                }
            }
        }
        None => None,
    };

    let report = parse_optics_diagnostics(inputs.optics_diagnostics, device, inputs.timestamp_us)?;
    let mut report = merge_metadata(&system, &chassis, &slot_detail, fec.as_ref(), report);
    calculator.apply_report(&mut report)?;
    Ok(report)
}
