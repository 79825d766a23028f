//! Cross-cycle counter-delta calculation.
//!
//! The FEC codeword counters are cumulative; the useful signal is their
//! delta and rate across collection cycles. This module keeps the previous
//! cycle's counter values per (device, interface) in an injected
//! [`StateStore`] and computes deltas on top of the fused records.
//!
//! Cold start is explicit: with no baseline, delta, rate, and interval are
//! all absent, never zero, so a consumer cannot mistake a first observation
//! for a healthy flat counter. Counter regression (device reset) is not
//! special-cased and simply yields a negative delta.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OpticsError, Result};
use crate::records::{InterfaceRecord, OpticsReport};

/// Last-seen counter values for one (device, interface) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    /// Collection timestamp, microseconds since the epoch.
    pub timestamp: i64,
    pub fec_ccw: Option<f64>,
    pub fec_nccw: Option<f64>,
}

/// Key-value store for counter state, keyed by (device, interface).
///
/// The calculator assumes single-writer access per key per cycle; callers
/// running multiple devices concurrently must use one store (or one
/// partition) per device.
pub trait StateStore {
    /// Load the previous cycle's state, `None` on first observation.
    fn load(&self, device: &str, if_name: &str) -> Result<Option<CounterState>>;

    /// Persist the current cycle's state.
    fn store(&mut self, device: &str, if_name: &str, state: &CounterState) -> Result<()>;
}

/// In-memory store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: HashMap<(String, String), CounterState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, device: &str, if_name: &str) -> Result<Option<CounterState>> {
        Ok(self
            .states
            .get(&(device.to_string(), if_name.to_string()))
            .cloned())
    }

    fn store(&mut self, device: &str, if_name: &str, state: &CounterState) -> Result<()> {
        self.states
            .insert((device.to_string(), if_name.to_string()), state.clone());
        Ok(())
    }
}

/// File-backed store: one JSON document per (device, interface) key.
///
/// Stale entries are never deleted here; the directory is exposed so
/// operators can prune decommissioned interfaces externally.
#[derive(Debug)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Open (creating if needed) a state directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the per-key state files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn state_path(&self, device: &str, if_name: &str) -> PathBuf {
        // Interface names carry '/' and ':'; sanitize for the filesystem.
        let safe_if = if_name.replace(['/', ':'], "_");
        self.dir.join(format!("{}_{}.json", device, safe_if))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, device: &str, if_name: &str) -> Result<Option<CounterState>> {
        let path = self.state_path(device, if_name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                // A corrupt state file degrades to a cold start; the next
                // store() overwrites it.
                warn!("{}: unreadable state file {:?}: {}", device, path, err);
                Ok(None)
            }
        }
    }

    fn store(&mut self, device: &str, if_name: &str, state: &CounterState) -> Result<()> {
        let path = self.state_path(device, if_name);
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&path, json).map_err(|err| {
            OpticsError::StateStore(format!("writing {:?}: {}", path, err))
        })
    }
}

/// Computes per-counter deltas and rates across collection cycles.
pub struct DeltaCalculator<S: StateStore> {
    store: S,
}

impl<S: StateStore> DeltaCalculator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Compute deltas for one fused interface record and persist its
    /// counters as the next cycle's baseline.
    ///
    /// State is persisted unconditionally, whether or not a delta was
    /// computable, so the next cycle always has a baseline.
    pub fn apply(&mut self, record: &mut InterfaceRecord) -> Result<()> {
        let previous = self.store.load(&record.device, &record.if_name)?;

        let current = CounterState {
            timestamp: record.timestamp,
            fec_ccw: record.fec_ccw,
            fec_nccw: record.fec_nccw,
        };

        if let Some(previous) = previous {
            let interval = (record.timestamp - previous.timestamp) as f64 / 1_000_000.0;
            // Non-positive interval: clock skew or a duplicate collection.
            // No delta is emitted, but the state below still advances.
            if interval > 0.0 {
                if let (Some(cur), Some(prev)) = (record.fec_ccw, previous.fec_ccw) {
                    record.fec_ccw_delta = Some(cur - prev);
                    record.fec_ccw_rate = Some((cur - prev) / interval);
                }
                if let (Some(cur), Some(prev)) = (record.fec_nccw, previous.fec_nccw) {
                    record.fec_nccw_delta = Some(cur - prev);
                    record.fec_nccw_rate = Some((cur - prev) / interval);
                }
                record.collection_interval_sec = Some(interval);
            }
        }

        self.store.store(&record.device, &record.if_name, &current)
    }

    /// Delta pass over a whole fused report.
    pub fn apply_report(&mut self, report: &mut OpticsReport) -> Result<()> {
        for record in &mut report.interfaces {
            self.apply(record)?;
        }
        Ok(())
    }

    /// Consume the calculator and return its store.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(timestamp: i64, ccw: Option<f64>, nccw: Option<f64>) -> InterfaceRecord {
        let mut record = InterfaceRecord::new("et-0/0/6", "switch1", timestamp);
        record.fec_ccw = ccw;
        record.fec_nccw = nccw;
        record
    }

    #[test]
    fn test_cold_start_yields_no_deltas() {
        let mut calc = DeltaCalculator::new(MemoryStateStore::new());
        let mut rec = record(1_000_000, Some(40.0), Some(1.0));
        calc.apply(&mut rec).unwrap();

        assert_eq!(rec.fec_ccw_delta, None);
        assert_eq!(rec.fec_ccw_rate, None);
        assert_eq!(rec.fec_nccw_delta, None);
        assert_eq!(rec.collection_interval_sec, None);

        // State was persisted regardless.
        let store = calc.into_store();
        let state = store.load("switch1", "et-0/0/6").unwrap().unwrap();
        assert_eq!(state.fec_ccw, Some(40.0));
    }

    #[test]
    fn test_second_cycle_computes_delta_and_rate() {
        let mut calc = DeltaCalculator::new(MemoryStateStore::new());
        calc.apply(&mut record(1_000_000, Some(40.0), Some(0.0))).unwrap();

        // Ten seconds later.
        let mut rec = record(11_000_000, Some(100.0), Some(5.0));
        calc.apply(&mut rec).unwrap();

        assert_eq!(rec.collection_interval_sec, Some(10.0));
        assert_eq!(rec.fec_ccw_delta, Some(60.0));
        assert_eq!(rec.fec_ccw_rate, Some(6.0));
        assert_eq!(rec.fec_nccw_delta, Some(5.0));
        assert_eq!(rec.fec_nccw_rate, Some(0.5));
    }

    #[test]
    fn test_counter_regression_reports_negative_delta() {
        let mut calc = DeltaCalculator::new(MemoryStateStore::new());
        calc.apply(&mut record(1_000_000, Some(500.0), None)).unwrap();

        let mut rec = record(2_000_000, Some(10.0), None);
        calc.apply(&mut rec).unwrap();
        assert_eq!(rec.fec_ccw_delta, Some(-490.0));
    }

    #[test]
    fn test_non_positive_interval_emits_nothing_but_persists() {
        let mut calc = DeltaCalculator::new(MemoryStateStore::new());
        calc.apply(&mut record(5_000_000, Some(40.0), None)).unwrap();

        // Clock went backwards.
        let mut rec = record(4_000_000, Some(100.0), None);
        calc.apply(&mut rec).unwrap();
        assert_eq!(rec.fec_ccw_delta, None);
        assert_eq!(rec.collection_interval_sec, None);

        // State still advanced to the current observation.
        let store = calc.into_store();
        let state = store.load("switch1", "et-0/0/6").unwrap().unwrap();
        assert_eq!(state.timestamp, 4_000_000);
        assert_eq!(state.fec_ccw, Some(100.0));
    }

    #[test]
    fn test_counters_independent() {
        let mut calc = DeltaCalculator::new(MemoryStateStore::new());
        // Baseline has only ccw; second cycle has both.
        calc.apply(&mut record(1_000_000, Some(40.0), None)).unwrap();

        let mut rec = record(2_000_000, Some(50.0), Some(3.0));
        calc.apply(&mut rec).unwrap();
        assert_eq!(rec.fec_ccw_delta, Some(10.0));
        // nccw had no baseline: no delta, but the interval still applies.
        assert_eq!(rec.fec_nccw_delta, None);
        assert_eq!(rec.collection_interval_sec, Some(1.0));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStateStore::new(dir.path()).unwrap();

        assert_eq!(store.load("switch1", "et-0/0/6:2").unwrap(), None);

        let state = CounterState {
            timestamp: 42,
            fec_ccw: Some(1.0),
            fec_nccw: None,
        };
        store.store("switch1", "et-0/0/6:2", &state).unwrap();
        assert_eq!(store.load("switch1", "et-0/0/6:2").unwrap(), Some(state));

        // Sanitized file name: no '/' or ':' survives.
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["switch1_et-0_0_6_2.json"]);
    }

    #[test]
    fn test_file_store_corrupt_state_is_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStateStore::new(dir.path()).unwrap();
        store
            .store(
                "switch1",
                "et-0/0/6",
                &CounterState {
                    timestamp: 1,
                    fec_ccw: None,
                    fec_nccw: None,
                },
            )
            .unwrap();

        // Corrupt the file behind the store's back.
        let path = dir.path().join("switch1_et-0_0_6.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(store.load("switch1", "et-0/0/6").unwrap(), None);
    }

    #[test]
    fn test_keys_isolated_per_device_and_interface() {
        let mut calc = DeltaCalculator::new(MemoryStateStore::new());
        calc.apply(&mut record(1_000_000, Some(40.0), None)).unwrap();

        let mut other = InterfaceRecord::new("et-0/0/7", "switch1", 2_000_000);
        other.fec_ccw = Some(99.0);
        calc.apply(&mut other).unwrap();
        // Different interface: cold start, no delta from et-0/0/6's state.
        assert_eq!(other.fec_ccw_delta, None);
    }
}
