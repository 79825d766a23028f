//! System identity extractor.
//!
//! Pulls hostname, hardware model, and OS fields out of the
//! system-information document and derives the device profile label used to
//! group devices downstream.

use log::warn;
use roxmltree::Document;

use optics_common::{child_text, find_descendants};

use crate::error::Result;

/// Device identity extract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemInformation {
    pub device: String,
    pub origin_hostname: Option<String>,
    pub hardware_model: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    /// Profile label, `Juniper_{model}` when the model is known.
    pub device_profile: Option<String>,
}

/// Parse a system-information document.
///
/// A document without a system-information element yields an identity with
/// only the device name filled in; fusion then simply adds no identity
/// fields.
pub fn parse_system_information(xml: &str, device: &str) -> Result<SystemInformation> {
    let doc = Document::parse(xml)?;

    let sys_info = match find_descendants(doc.root_element(), "system-information")
        .into_iter()
        .next()
    {
        Some(elem) => elem,
        None => {
            warn!("{}: no system-information element found", device);
            return Ok(SystemInformation {
                device: device.to_string(),
                ..Default::default()
            });
        }
    };

    let hardware_model = child_text(sys_info, "hardware-model").map(str::to_string);
    let device_profile = hardware_model
        .as_deref()
        .map(|model| format!("Juniper_{}", model));

    Ok(SystemInformation {
        device: device.to_string(),
        origin_hostname: Some(
            child_text(sys_info, "host-name")
                .unwrap_or(device)
                .to_string(),
        ),
        hardware_model,
        os_name: child_text(sys_info, "os-name").map(str::to_string),
        os_version: child_text(sys_info, "os-version").map(str::to_string),
        device_profile,
    })
}
