//! # optics-common - Shared Telemetry Normalization Primitives
//!
//! Leaf library shared by the telemetry extractors. Provides:
//!
//! - Namespace-agnostic XML tree accessors (`xml`)
//! - Canonical interface-name resolution from chassis slot coordinates
//!   (`ifname`)
//! - Single-mode vs multi-mode fiber classification heuristics (`fiber`)
//!
//! Everything here is pure: no I/O, no global mutable state. Lookup tables
//! (platform prefixes, fiber keyword sets) are immutable values with builtin
//! defaults that callers inject, so tests can substitute alternates.

pub mod fiber;
pub mod ifname;
pub mod xml;

pub use fiber::{FiberClassifier, FiberType};
pub use ifname::{canonical_name, canonicalize, slot_component, PrefixTable, SlotComponent};
pub use xml::{
    child_text, clean_field, clean_firmware, counter_value, find_child, find_children,
    find_descendants, numeric_value,
};
