//! opticsyncd entry point.
//!
//! Reads one cycle's worth of collected XML documents from disk, runs the
//! normalization-and-fusion pipeline, and writes the fused records as JSON.
//! Counter state persists across invocations when a state directory is
//! given; otherwise every run is a cold start.

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

use optics_common::{FiberClassifier, PrefixTable};
use opticsyncd::pipeline::{run_cycle, CycleInputs, PicDocument};
use opticsyncd::throughput::{DeltaCalculator, FileStateStore, MemoryStateStore, StateStore};

/// Optical telemetry normalization and fusion
#[derive(Parser, Debug)]
#[command(name = "opticsyncd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Device name or address the documents were collected from
    #[arg(short, long)]
    device: String,

    /// Hardware model override for interface-prefix selection
    #[arg(long)]
    platform: Option<String>,

    /// Path to the system-information XML document
    #[arg(long)]
    system_info: Option<PathBuf>,

    /// Path to the chassis-inventory XML document
    #[arg(long)]
    chassis_inventory: Option<PathBuf>,

    /// Per-slot detail document as FPC:PIC:PATH, repeatable
    #[arg(long = "pic-detail")]
    pic_details: Vec<String>,

    /// Path to the optics-diagnostics XML document
    #[arg(long)]
    optics_diagnostics: PathBuf,

    /// Path to the interface-statistics XML document
    #[arg(long)]
    interface_statistics: Option<PathBuf>,

    /// Directory for cross-run counter state; omit for in-memory state
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Output file for the fused JSON report; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// A pic-detail argument split into slot coordinates and document path.
struct PicDetailArg {
    fpc: u32,
    pic: u32,
    path: PathBuf,
}

fn parse_pic_detail_arg(arg: &str) -> anyhow::Result<PicDetailArg> {
    let mut parts = arg.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(fpc), Some(pic), Some(path)) => Ok(PicDetailArg {
            fpc: fpc.parse().context("invalid FPC slot number")?,
            pic: pic.parse().context("invalid PIC slot number")?,
            path: PathBuf::from(path),
        }),
        _ => bail!("expected FPC:PIC:PATH, got {:?}", arg),
    }
}

fn read_optional(path: Option<&PathBuf>) -> anyhow::Result<Option<String>> {
    match path {
        Some(path) => {
            let contents =
                fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
            Ok(Some(contents))
        }
        None => Ok(None),
    }
}

fn execute<S: StateStore>(args: &Args, store: S) -> anyhow::Result<()> {
    let system_information = read_optional(args.system_info.as_ref())?;
    let chassis_inventory = read_optional(args.chassis_inventory.as_ref())?;
    let interface_statistics = read_optional(args.interface_statistics.as_ref())?;
    let optics_diagnostics = fs::read_to_string(&args.optics_diagnostics)
        .with_context(|| format!("reading {:?}", args.optics_diagnostics))?;

    let mut pic_contents = Vec::with_capacity(args.pic_details.len());
    for arg in &args.pic_details {
        let parsed = parse_pic_detail_arg(arg)?;
        let xml = fs::read_to_string(&parsed.path)
            .with_context(|| format!("reading {:?}", parsed.path))?;
        pic_contents.push((parsed.fpc, parsed.pic, xml));
    }
    let pic_documents: Vec<PicDocument<'_>> = pic_contents
        .iter()
        .map(|(fpc, pic, xml)| PicDocument {
            fpc: *fpc,
            pic: *pic,
            xml,
        })
        .collect();

    let inputs = CycleInputs {
        device: &args.device,
        platform_hint: args.platform.as_deref(),
        system_information: system_information.as_deref(),
        chassis_inventory: chassis_inventory.as_deref(),
        pic_details: &pic_documents,
        optics_diagnostics: &optics_diagnostics,
        interface_statistics: interface_statistics.as_deref(),
        timestamp_us: chrono::Utc::now().timestamp_micros(),
    };

    let prefixes = PrefixTable::default();
    let classifier = FiberClassifier::default();
    let mut calculator = DeltaCalculator::new(store);

    let report = run_cycle(&inputs, &prefixes, &classifier, &mut calculator)
        .with_context(|| format!("processing telemetry from {}", args.device))?;

    info!(
        "{}: fused {} interface and {} lane records",
        args.device,
        report.interfaces.len(),
        report.lanes.len()
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {:?}", path))?
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    match &args.state_dir {
        Some(dir) => {
            let store = FileStateStore::new(dir.clone())
                .with_context(|| format!("opening state directory {:?}", dir))?;
            execute(&args, store)
        }
        None => execute(&args, MemoryStateStore::new()),
    }
}
