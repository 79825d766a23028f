//! Fused per-interface and per-lane record types.
//!
//! One [`InterfaceRecord`] per physical interface and one [`LaneRecord`] per
//! optical lane, carrying measurements from the diagnostics document plus
//! metadata fused in from the inventory, per-slot, and identity sources.
//! Every optional field serializes only when present, so a downstream
//! consumer can distinguish "not reported" from a present zero.

use optics_common::FiberType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fused record for one physical interface.
///
/// Built fresh every collection cycle. Interface-level DOM fields
/// (`rx_power`, `tx_power`, `tx_bias` and mW variants) are populated only
/// when the interface has no lanes; threshold fields are always
/// interface-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub if_name: String,
    pub device: String,
    /// Collection timestamp, microseconds since the epoch.
    pub timestamp: i64,

    // Temperature thresholds (degrees C)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_high_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_low_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_high_warn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_low_warn: Option<f64>,

    // Module voltage thresholds (V)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_high_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_low_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_high_warn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_low_warn: Option<f64>,

    // TX power thresholds (dBm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_high_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_low_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_high_warn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_low_warn: Option<f64>,

    // RX power thresholds (dBm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power_high_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power_low_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power_high_warn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power_low_warn: Option<f64>,

    // Laser bias current thresholds (mA)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bias_high_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bias_low_alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bias_high_warn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bias_low_warn: Option<f64>,

    // Module-level measured values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,

    // Interface-level DOM, set iff the interface has no lanes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bias: Option<f64>,

    // Device identity (fused)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_profile: Option<String>,
    /// Chassis serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_name: Option<String>,

    // Transceiver metadata (fused)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cable_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wavelength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_type: Option<FiberType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_rev: Option<String>,

    // Link state and traffic (fused from interface statistics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oper_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_bps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_bps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_pps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_bps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_pps: Option<f64>,

    // FEC counters (monotonic) and rates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_ccw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_nccw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_ccw_error_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_nccw_error_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_fec_ber: Option<f64>,

    /// FEC symbol-error histogram, flat `histogram_bin_{0..15}` keys with
    /// `_live` / `_harvest` component fields.
    #[serde(flatten)]
    pub histogram: BTreeMap<String, f64>,

    // Cross-cycle counter deltas; absent on cold start or non-positive
    // collection interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_ccw_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_ccw_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_nccw_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fec_nccw_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_interval_sec: Option<f64>,
}

impl InterfaceRecord {
    /// Create an empty record carrying only identity.
    pub fn new(if_name: impl Into<String>, device: impl Into<String>, timestamp: i64) -> Self {
        Self {
            if_name: if_name.into(),
            device: device.into(),
            timestamp,
            temperature_high_alarm: None,
            temperature_low_alarm: None,
            temperature_high_warn: None,
            temperature_low_warn: None,
            voltage_high_alarm: None,
            voltage_low_alarm: None,
            voltage_high_warn: None,
            voltage_low_warn: None,
            tx_power_high_alarm: None,
            tx_power_low_alarm: None,
            tx_power_high_warn: None,
            tx_power_low_warn: None,
            rx_power_high_alarm: None,
            rx_power_low_alarm: None,
            rx_power_high_warn: None,
            rx_power_low_warn: None,
            tx_bias_high_alarm: None,
            tx_bias_low_alarm: None,
            tx_bias_high_warn: None,
            tx_bias_low_warn: None,
            temperature: None,
            voltage: None,
            rx_power_mw: None,
            rx_power: None,
            tx_power_mw: None,
            tx_power: None,
            tx_bias: None,
            origin_hostname: None,
            device_profile: None,
            origin_name: None,
            vendor: None,
            part_number: None,
            serial_number: None,
            cable_type: None,
            media_type: None,
            wavelength: None,
            fiber_type: None,
            firmware_version: None,
            vendor_rev: None,
            admin_status: None,
            oper_status: None,
            speed_bps: None,
            input_bps: None,
            input_pps: None,
            output_bps: None,
            output_pps: None,
            fec_ccw: None,
            fec_nccw: None,
            fec_ccw_error_rate: None,
            fec_nccw_error_rate: None,
            pre_fec_ber: None,
            histogram: BTreeMap::new(),
            fec_ccw_delta: None,
            fec_ccw_rate: None,
            fec_nccw_delta: None,
            fec_nccw_rate: None,
            collection_interval_sec: None,
        }
    }

    /// True when the interface reports no DOM at interface scope, i.e. the
    /// DOM lives on its lanes.
    pub fn has_interface_dom(&self) -> bool {
        self.rx_power.is_some()
            || self.rx_power_mw.is_some()
            || self.tx_power.is_some()
            || self.tx_power_mw.is_some()
            || self.tx_bias.is_some()
    }
}

/// Fused record for one optical lane of a multiplexed interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneRecord {
    pub if_name: String,
    pub device: String,
    /// Lane index, taken verbatim from the source document.
    pub lane: u32,
    /// Collection timestamp, microseconds since the epoch.
    pub timestamp: i64,

    // Lane DOM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bias: Option<f64>,

    // Device identity (fused)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_name: Option<String>,

    // Transceiver metadata (fused, shared with the parent interface)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cable_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wavelength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_type: Option<FiberType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_rev: Option<String>,
}

impl LaneRecord {
    /// Create an empty lane record carrying only identity.
    pub fn new(
        if_name: impl Into<String>,
        device: impl Into<String>,
        lane: u32,
        timestamp: i64,
    ) -> Self {
        Self {
            if_name: if_name.into(),
            device: device.into(),
            lane,
            timestamp,
            rx_power_mw: None,
            rx_power: None,
            tx_power_mw: None,
            tx_power: None,
            tx_bias: None,
            origin_hostname: None,
            device_profile: None,
            origin_name: None,
            vendor: None,
            part_number: None,
            serial_number: None,
            cable_type: None,
            media_type: None,
            wavelength: None,
            fiber_type: None,
            firmware_version: None,
            vendor_rev: None,
        }
    }
}

/// The terminal per-cycle artifact: all fused interface and lane records
/// for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpticsReport {
    pub interfaces: Vec<InterfaceRecord>,
    pub lanes: Vec<LaneRecord>,
}

impl OpticsReport {
    /// True when the cycle produced no records at all.
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty() && self.lanes.is_empty()
    }
}
