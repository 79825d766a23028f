//! Optical diagnostics extractor.
//!
//! Walks the interface-information document and emits, per physical
//! interface, threshold metrics (always interface-scoped) and DOM
//! measurements at whichever granularity the hardware actually reports:
//!
//! - no diagnostics subtree, or an explicit "not available" marker: the
//!   interface contributes nothing at all;
//! - diagnostics present, no lane elements: one interface record carrying
//!   thresholds and interface-level DOM;
//! - one or more lane elements: one interface record carrying thresholds
//!   only, plus one lane record per reported lane index.
//!
//! A single unparseable interface never poisons the rest of the document.

use log::{debug, warn};
use roxmltree::{Document, Node};

use optics_common::{child_text, find_child, find_descendants, numeric_value};

use crate::error::Result;
use crate::records::{InterfaceRecord, LaneRecord, OpticsReport};

/// Marker element the hardware emits for ports without DOM support.
const NOT_AVAILABLE_TAG: &str = "optic-diagnostics-not-available";

/// Parse an interface-information document into diagnostics records.
///
/// `timestamp_us` is the collection timestamp in microseconds, stamped onto
/// every record so the counter-delta pass has a time base.
pub fn parse_optics_diagnostics(xml: &str, device: &str, timestamp_us: i64) -> Result<OpticsReport> {
    let doc = Document::parse(xml)?;

    let mut report = OpticsReport::default();

    for phys in find_descendants(doc.root_element(), "physical-interface") {
        let if_name = match child_text(phys, "name") {
            Some(name) => name.trim(),
            None => {
                warn!("{}: physical-interface without a name, dropped", device);
                continue;
            }
        };

        let diag = match find_child(phys, "optics-diagnostics") {
            Some(diag) => diag,
            None => continue,
        };
        if find_child(diag, NOT_AVAILABLE_TAG).is_some() {
            debug!("{}: {}: diagnostics not available", device, if_name);
            continue;
        }

        let lanes = find_descendants(diag, "optics-diagnostics-lane-values");

        let mut record = InterfaceRecord::new(if_name, device, timestamp_us);
        fill_thresholds(&mut record, diag);
        record.temperature = module_temperature(diag);
        record.voltage = numeric_value(child_text(diag, "module-voltage"));

        if lanes.is_empty() {
            // Single-lane module: DOM collapses to interface scope.
            record.rx_power_mw = numeric_value(child_text(diag, "laser-rx-optical-power"));
            record.rx_power = numeric_value(child_text(diag, "laser-rx-optical-power-dbm"));
            record.tx_power_mw = numeric_value(child_text(diag, "laser-output-power"));
            record.tx_power = numeric_value(child_text(diag, "laser-output-power-dbm"));
            record.tx_bias = numeric_value(child_text(diag, "laser-bias-current"));
        } else {
            for lane_elem in lanes {
                let lane_index: u32 = child_text(lane_elem, "lane-index")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(0);

                let mut lane = LaneRecord::new(if_name, device, lane_index, timestamp_us);
                lane.rx_power_mw = numeric_value(child_text(lane_elem, "laser-rx-optical-power"));
                lane.rx_power = numeric_value(child_text(lane_elem, "laser-rx-optical-power-dbm"));
                lane.tx_power_mw = numeric_value(child_text(lane_elem, "laser-output-power"));
                lane.tx_power = numeric_value(child_text(lane_elem, "laser-output-power-dbm"));
                lane.tx_bias = numeric_value(child_text(lane_elem, "laser-bias-current"));
                report.lanes.push(lane);
            }
        }

        report.interfaces.push(record);
    }

    Ok(report)
}

/// Alarm/warn thresholds, always interface-scoped.
fn fill_thresholds(record: &mut InterfaceRecord, diag: Node) {
    let value = |tag: &str| numeric_value(child_text(diag, tag));

    record.temperature_high_alarm = value("laser-temperature-high-alarm-threshold");
    record.temperature_low_alarm = value("laser-temperature-low-alarm-threshold");
    record.temperature_high_warn = value("laser-temperature-high-warn-threshold");
    record.temperature_low_warn = value("laser-temperature-low-warn-threshold");

    record.voltage_high_alarm = value("module-voltage-high-alarm-threshold");
    record.voltage_low_alarm = value("module-voltage-low-alarm-threshold");
    record.voltage_high_warn = value("module-voltage-high-warn-threshold");
    record.voltage_low_warn = value("module-voltage-low-warn-threshold");

    record.tx_power_high_alarm = value("laser-tx-power-high-alarm-threshold-dbm");
    record.tx_power_low_alarm = value("laser-tx-power-low-alarm-threshold-dbm");
    record.tx_power_high_warn = value("laser-tx-power-high-warn-threshold-dbm");
    record.tx_power_low_warn = value("laser-tx-power-low-warn-threshold-dbm");

    record.rx_power_high_alarm = value("laser-rx-power-high-alarm-threshold-dbm");
    record.rx_power_low_alarm = value("laser-rx-power-low-alarm-threshold-dbm");
    record.rx_power_high_warn = value("laser-rx-power-high-warn-threshold-dbm");
    record.rx_power_low_warn = value("laser-rx-power-low-warn-threshold-dbm");

    record.tx_bias_high_alarm = value("laser-bias-current-high-alarm-threshold");
    record.tx_bias_low_alarm = value("laser-bias-current-low-alarm-threshold");
    record.tx_bias_high_warn = value("laser-bias-current-high-warn-threshold");
    record.tx_bias_low_warn = value("laser-bias-current-low-warn-threshold");
}

/// Module temperature from the `celsius` attribute of module-temperature.
///
/// The attribute is namespace-qualified with a release-specific URI, so it
/// is located by local name, like element lookups.
fn module_temperature(diag: Node) -> Option<f64> {
    let temp_elem = find_child(diag, "module-temperature")?;
    let celsius = temp_elem
        .attributes()
        .find(|attr| attr.name().to_ascii_lowercase().contains("celsius"))
        .map(|attr| attr.value());
    numeric_value(celsius)
}
