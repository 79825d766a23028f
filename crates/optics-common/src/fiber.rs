//! Fiber-type classification heuristics.
//!
//! Infers single-mode vs multi-mode fiber from whatever signal a transceiver
//! exposes, in decreasing order of reliability: a measured wavelength is
//! ground truth, a structured media-type token is next, and free-text
//! descriptions are a last resort.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::xml::clean_field;

/// Fiber mode of an optical link. Unknown is represented as `None` at the
/// call sites, never as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiberType {
    /// Single-mode fiber (long reach, 1310/1550 nm lasers).
    #[serde(rename = "FIBER_TYPE_SINGLE_MODE")]
    SingleMode,
    /// Multi-mode fiber (short reach, 850 nm VCSELs).
    #[serde(rename = "FIBER_TYPE_MULTI_MODE")]
    MultiMode,
}

impl FiberType {
    /// Stable wire identifier used in exported records.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FiberType::SingleMode => "FIBER_TYPE_SINGLE_MODE",
            FiberType::MultiMode => "FIBER_TYPE_MULTI_MODE",
        }
    }
}

impl fmt::Display for FiberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One keyword rule: a token to look for and the mode it implies.
type KeywordRule = (&'static str, FiberType);

/// Multi-mode keywords are listed before single-mode ones and win on any
/// match, even when a single-mode keyword also matches the same token.
/// That tie-break is deliberate and load-bearing; see the ordered rule
/// evaluation in [`FiberClassifier::classify`].
const MEDIA_RULES: &[KeywordRule] = &[
    ("SR", FiberType::MultiMode),
    ("SX", FiberType::MultiMode),
    ("VCSEL", FiberType::MultiMode),
    ("850NM", FiberType::MultiMode),
    ("MMF", FiberType::MultiMode),
    ("MULTIMODE", FiberType::MultiMode),
    ("LR", FiberType::SingleMode),
    ("ER", FiberType::SingleMode),
    ("ZR", FiberType::SingleMode),
    ("LX", FiberType::SingleMode),
    ("EX", FiberType::SingleMode),
    ("ZX", FiberType::SingleMode),
    ("1310NM", FiberType::SingleMode),
    ("1550NM", FiberType::SingleMode),
    ("CWDM", FiberType::SingleMode),
    ("DWDM", FiberType::SingleMode),
    ("SMF", FiberType::SingleMode),
    ("SINGLEMODE", FiberType::SingleMode),
];

/// Description rules extend the media rules with generic reach terms.
const DESCRIPTION_RULES: &[KeywordRule] = &[
    ("SR", FiberType::MultiMode),
    ("SX", FiberType::MultiMode),
    ("VCSEL", FiberType::MultiMode),
    ("850NM", FiberType::MultiMode),
    ("MMF", FiberType::MultiMode),
    ("MULTIMODE", FiberType::MultiMode),
    ("SHORT", FiberType::MultiMode),
    ("LR", FiberType::SingleMode),
    ("ER", FiberType::SingleMode),
    ("ZR", FiberType::SingleMode),
    ("LX", FiberType::SingleMode),
    ("EX", FiberType::SingleMode),
    ("ZX", FiberType::SingleMode),
    ("1310NM", FiberType::SingleMode),
    ("1550NM", FiberType::SingleMode),
    ("CWDM", FiberType::SingleMode),
    ("DWDM", FiberType::SingleMode),
    ("SMF", FiberType::SingleMode),
    ("SINGLEMODE", FiberType::SingleMode),
    ("LONG", FiberType::SingleMode),
    ("EXTENDED", FiberType::SingleMode),
];

/// Fiber-type classifier with injectable keyword tables.
///
/// The default tables carry the production keyword sets; tests substitute
/// their own via [`FiberClassifier::new`].
#[derive(Debug, Clone)]
pub struct FiberClassifier {
    media_rules: Vec<(String, FiberType)>,
    description_rules: Vec<(String, FiberType)>,
}

impl FiberClassifier {
    /// Build a classifier from explicit ordered rule lists.
    pub fn new<I, J, K>(media_rules: I, description_rules: J) -> Self
    where
        I: IntoIterator<Item = (K, FiberType)>,
        J: IntoIterator<Item = (K, FiberType)>,
        K: Into<String>,
    {
        Self {
            media_rules: media_rules
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
            description_rules: description_rules
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    /// Classify fiber type, short-circuiting on the first signal that
    /// matches.
    ///
    /// Order is fixed: wavelength, then media-type token, then free-text
    /// description. `None` means no signal was conclusive.
    pub fn classify(
        &self,
        media_type: Option<&str>,
        description: Option<&str>,
        wavelength_nm: Option<u32>,
    ) -> Option<FiberType> {
        if let Some(nm) = wavelength_nm {
            if nm == 850 {
                return Some(FiberType::MultiMode);
            }
            if nm == 1310 || nm == 1550 {
                return Some(FiberType::SingleMode);
            }
            // CWDM/DWDM grid wavelengths
            if (1270..=1610).contains(&nm) {
                return Some(FiberType::SingleMode);
            }
        }

        if let Some(media) = media_type {
            if let Some(mode) = match_rules(&self.media_rules, media) {
                return Some(mode);
            }
        }

        if let Some(desc) = description {
            if let Some(mode) = match_rules(&self.description_rules, desc) {
                return Some(mode);
            }
        }

        None
    }
}

impl Default for FiberClassifier {
    fn default() -> Self {
        Self::new(
            MEDIA_RULES.iter().map(|&(k, v)| (k, v)),
            DESCRIPTION_RULES.iter().map(|&(k, v)| (k, v)),
        )
    }
}

/// Evaluate an ordered rule list against a normalized haystack,
/// first match wins.
fn match_rules(rules: &[(String, FiberType)], text: &str) -> Option<FiberType> {
    let haystack: String = text
        .to_ascii_uppercase()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect();
    rules
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword.as_str()))
        .map(|(_, mode)| *mode)
}

/// Map a per-slot `fiber-mode` field to a fiber type.
///
/// The per-slot document reports the mode directly (`"Multi Mode"`,
/// `"Single Mode"`, or abbreviated `MM`/`SM`); unpopulated sentinels map to
/// `None`.
pub fn fiber_mode(text: Option<&str>) -> Option<FiberType> {
    let value = clean_field(text)?.to_ascii_lowercase();
    if value.contains("multi") || value.contains("mm") {
        Some(FiberType::MultiMode)
    } else if value.contains("single") || value.contains("sm") {
        Some(FiberType::SingleMode)
    } else {
        None
    }
}
