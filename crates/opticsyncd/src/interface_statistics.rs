//! Interface FEC and traffic statistics extractor.
//!
//! Pulls the monotonic FEC codeword counters (the degradation signal the
//! counter-delta pass feeds on), error rates, pre-FEC BER, and the FEC
//! symbol-error histogram out of the interface-information document, plus
//! link state and traffic rates for context. Interfaces without FEC
//! counters (copper, management) are dropped.

use log::warn;
use roxmltree::Document;
use std::collections::BTreeMap;

use optics_common::{child_text, counter_value, find_child, find_children, find_descendants};

use crate::error::Result;

/// FEC and traffic statistics for one physical interface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FecStatistics {
    pub if_name: String,
    pub device: String,
    /// Collection timestamp, microseconds since the epoch.
    pub timestamp: i64,
    pub admin_status: Option<String>,
    pub oper_status: Option<String>,
    pub speed_bps: Option<u64>,
    pub input_bps: Option<f64>,
    pub input_pps: Option<f64>,
    pub output_bps: Option<f64>,
    pub output_pps: Option<f64>,
    /// FEC corrected codeword count (cumulative).
    pub fec_ccw: Option<f64>,
    /// FEC uncorrected codeword count (cumulative).
    pub fec_nccw: Option<f64>,
    pub fec_ccw_error_rate: Option<f64>,
    pub fec_nccw_error_rate: Option<f64>,
    pub pre_fec_ber: Option<f64>,
    /// Flat `histogram_bin_{n}[_live|_harvest]` fields, bins 0-15.
    pub histogram: BTreeMap<String, f64>,
}

/// All FEC-capable interfaces from one document.
#[derive(Debug, Clone, Default)]
pub struct FecReport {
    pub interfaces: Vec<FecStatistics>,
}

/// Parse a speed string to bits per second (`"400Gbps"` -> 400e9).
pub fn parse_speed(text: &str) -> Option<u64> {
    let lowered = text.trim().to_ascii_lowercase();
    // "bps" must come last: every unit suffix ends with it.
    const UNITS: [(&str, u64); 4] = [
        ("gbps", 1_000_000_000),
        ("mbps", 1_000_000),
        ("kbps", 1_000),
        ("bps", 1),
    ];
    for (unit, multiplier) in UNITS {
        if let Some(value) = lowered.strip_suffix(unit) {
            let parsed: f64 = value.parse().ok()?;
            return Some((parsed * multiplier as f64) as u64);
        }
    }
    None
}

/// Parse FEC statistics out of an interface-information document.
///
/// `filter` restricts output to the named interfaces when present (exact
/// match on the reported name).
pub fn parse_interface_statistics(
    xml: &str,
    device: &str,
    timestamp_us: i64,
    filter: Option<&[String]>,
) -> Result<FecReport> {
    let doc = Document::parse(xml)?;

    let mut report = FecReport::default();

    for phys in find_descendants(doc.root_element(), "physical-interface") {
        let if_name = match child_text(phys, "name") {
            Some(name) => name.trim().to_string(),
            None => {
                warn!("{}: physical-interface without a name, dropped", device);
                continue;
            }
        };
        if let Some(filter) = filter {
            if !filter.iter().any(|wanted| *wanted == if_name) {
                continue;
            }
        }

        let mut stats = FecStatistics {
            if_name,
            device: device.to_string(),
            timestamp: timestamp_us,
            ..Default::default()
        };

        stats.admin_status = child_text(phys, "admin-status").map(|s| s.trim().to_string());
        stats.oper_status = child_text(phys, "oper-status").map(|s| s.trim().to_string());
        stats.speed_bps = child_text(phys, "speed").and_then(parse_speed);

        if let Some(traffic) = find_child(phys, "traffic-statistics") {
            stats.input_bps = counter_value(child_text(traffic, "input-bps"));
            stats.input_pps = counter_value(child_text(traffic, "input-pps"));
            stats.output_bps = counter_value(child_text(traffic, "output-bps"));
            stats.output_pps = counter_value(child_text(traffic, "output-pps"));
        }

        if let Some(fec) = find_child(phys, "ethernet-fec-statistics") {
            stats.fec_ccw = counter_value(child_text(fec, "fec_ccw_count"));
            stats.fec_nccw = counter_value(child_text(fec, "fec_nccw_count"));
            stats.fec_ccw_error_rate = counter_value(child_text(fec, "fec_ccw_error_rate"));
            stats.fec_nccw_error_rate = counter_value(child_text(fec, "fec_nccw_error_rate"));
            stats.pre_fec_ber = counter_value(child_text(fec, "pre-fec-ber"));
        }

        for bin_elem in find_children(phys, "ethernet-fechistogram-statistics") {
            let bin: u32 = match counter_value(child_text(bin_elem, "bin-num")) {
                Some(n) if n >= 0.0 => n as u32,
                _ => continue,
            };
            let live = counter_value(child_text(bin_elem, "sym-live-err")).unwrap_or(0.0);
            let harvest = counter_value(child_text(bin_elem, "sym-harvest-err")).unwrap_or(0.0);

            stats
                .histogram
                .insert(format!("histogram_bin_{}", bin), live + harvest);
            stats
                .histogram
                .insert(format!("histogram_bin_{}_live", bin), live);
            stats
                .histogram
                .insert(format!("histogram_bin_{}_harvest", bin), harvest);
        }

        // Only optical interfaces report FEC; everything else is noise here.
        if stats.fec_ccw.is_some() || stats.fec_nccw.is_some() {
            report.interfaces.push(stats);
        }
    }

    Ok(report)
}
