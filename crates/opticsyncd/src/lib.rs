//! Optical Telemetry Normalization Daemon
//!
//! Normalizes vendor XML telemetry from optical switch ports into fused,
//! canonically-named records. Four document families feed one cycle:
//! system information (device identity), chassis inventory (transceiver
//! topology and vendor metadata), per-slot transceiver detail, and
//! interface statistics (FEC counters and traffic rates); the
//! optics-diagnostics document supplies the measurement backbone. Fusion
//! joins them on canonical interface names, and a stateful delta pass turns
//! the cumulative FEC counters into per-cycle deltas and rates.

pub mod chassis_inventory;
pub mod error;
pub mod interface_statistics;
pub mod merge;
pub mod optics_diagnostics;
pub mod pic_detail;
pub mod pipeline;
pub mod records;
pub mod system_information;
pub mod throughput;

pub use chassis_inventory::{
    parse_chassis_inventory, slot_pairs, vendor_info, ChassisInventory, ChassisTransceiver,
};
pub use error::{OpticsError, Result};
pub use interface_statistics::{parse_interface_statistics, parse_speed, FecReport, FecStatistics};
pub use merge::merge_metadata;
pub use optics_diagnostics::parse_optics_diagnostics;
pub use pic_detail::{combine, parse_pic_detail, PicDetail, PicTransceiver};
pub use pipeline::{run_cycle, CycleInputs, PicDocument};
pub use records::{InterfaceRecord, LaneRecord, OpticsReport};
pub use system_information::{parse_system_information, SystemInformation};
pub use throughput::{
    CounterState, DeltaCalculator, FileStateStore, MemoryStateStore, StateStore,
};
