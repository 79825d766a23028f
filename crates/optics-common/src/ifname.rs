//! Canonical interface naming and chassis slot coordinate mapping.
//!
//! Every data source spells the same physical port differently: the chassis
//! inventory reports slot coordinates (`FPC 0` / `PIC 0` / `Xcvr 6`), the
//! diagnostics document reports prefixed names that vary by hardware
//! generation (`et-0/0/6`, `xe-0/0/6`), and channelized ports add a `:N`
//! suffix. This module produces the single canonical spelling used as the
//! join key across all of them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Interface prefix used by modern platforms, and the canonical prefix every
/// spelling is normalized to.
pub const DEFAULT_PREFIX: &str = "et";

/// Legacy prefixes rewritten to [`DEFAULT_PREFIX`] during canonicalization.
const LEGACY_PREFIXES: [&str; 2] = ["xe-", "ge-"];

static FPC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)FPC\s+(\d+)").unwrap());
static PIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)PIC\s+(\d+)").unwrap());
static XCVR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Xcvr\s+(\d+)").unwrap());

/// A component of a chassis slot path, parsed from an inventory module name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotComponent {
    /// Module slot (`"FPC 0"`).
    Fpc(u32),
    /// Sub-slot (`"PIC 1"`).
    Pic(u32),
    /// Transceiver port (`"Xcvr 6"`).
    Port(u32),
}

/// Parse an inventory module name into a slot component.
///
/// Matching is case-insensitive and tolerates surrounding text. Names that
/// are not slot components (power supplies, routing engines, fans) yield
/// `None`.
pub fn slot_component(name: &str) -> Option<SlotComponent> {
    if let Some(caps) = FPC_RE.captures(name) {
        return caps[1].parse().ok().map(SlotComponent::Fpc);
    }
    if let Some(caps) = PIC_RE.captures(name) {
        return caps[1].parse().ok().map(SlotComponent::Pic);
    }
    if let Some(caps) = XCVR_RE.captures(name) {
        return caps[1].parse().ok().map(SlotComponent::Port);
    }
    None
}

/// Immutable platform-family -> interface-prefix lookup table.
///
/// Keys are matched as case-insensitive substrings of the platform hint,
/// most specific (longest) key first, so a `qfx5110` hint hits the
/// 10G-generation rule before the generic `qfx` families could shadow it.
/// Injected into the extractors so tests can substitute alternate tables.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    entries: Vec<(String, String)>,
}

impl PrefixTable {
    /// Build a table from (platform substring, prefix) pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(key, value)| (key.into().to_ascii_lowercase(), value.into()))
            .collect();
        // Longest key first so sub-model rules win over family rules.
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));
        Self { entries }
    }

    /// Look up the interface prefix for a platform hint.
    pub fn prefix_for(&self, platform_hint: &str) -> Option<&str> {
        let hint = platform_hint.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| hint.contains(key.as_str()))
            .map(|(_, prefix)| prefix.as_str())
    }

    /// Map chassis slot coordinates to an interface name.
    ///
    /// Pure function: an unknown or absent platform hint falls back to the
    /// modern `et` prefix.
    pub fn resolve(&self, module: u32, subslot: u32, port: u32, platform_hint: Option<&str>) -> String {
        let prefix = platform_hint
            .and_then(|hint| self.prefix_for(hint))
            .unwrap_or(DEFAULT_PREFIX);
        format!("{}-{}/{}/{}", prefix, module, subslot, port)
    }
}

impl Default for PrefixTable {
    /// Builtin platform table covering the supported hardware families.
    fn default() -> Self {
        Self::new([
            // QFX series
            ("qfx5240", "et"),
            ("qfx5230", "et"),
            ("qfx5220", "et"),
            ("qfx5210", "et"),
            ("qfx5200", "et"),
            ("qfx5130", "et"),
            ("qfx5120", "et"),
            ("qfx5110", "xe"),
            ("qfx5100", "xe"),
            ("qfx10k", "et"),
            // MX series
            ("mx", "et"),
            ("mx960", "et"),
            ("mx480", "et"),
            ("mx240", "et"),
            ("mx204", "et"),
            ("mx150", "et"),
            // PTX series
            ("ptx", "et"),
            ("ptx10k", "et"),
            ("ptx5000", "et"),
            ("ptx3000", "et"),
            ("ptx1000", "et"),
            // EX series (typically xe for 10G)
            ("ex", "xe"),
            ("ex4300", "ge"),
            ("ex4600", "et"),
        ])
    }
}

/// Split an interface name into its canonical parent name and channel.
///
/// Strips a trailing `:N` channel suffix (returned separately when it parses
/// as an integer) and rewrites legacy prefixes to the canonical `et-`
/// spelling, preserving the slot coordinates character for character.
/// Idempotent: canonicalizing a canonical name is a no-op.
pub fn canonicalize(name: &str) -> (String, Option<u32>) {
    let (base, channel) = match name.split_once(':') {
        Some((base, channel)) => (base, channel.parse::<u32>().ok()),
        None => (name, None),
    };

    for legacy in LEGACY_PREFIXES {
        if let Some(coords) = base.strip_prefix(legacy) {
            return (format!("{}-{}", DEFAULT_PREFIX, coords), channel);
        }
    }
    (base.to_string(), channel)
}

/// Canonical spelling of a full interface name, channel suffix preserved.
///
/// This is the join key for per-interface (as opposed to per-slot) data
/// sources, where each channel is its own record.
pub fn canonical_name(name: &str) -> String {
    match canonicalize(name) {
        (base, Some(channel)) => format!("{}:{}", base, channel),
        (base, None) => base,
    }
}
