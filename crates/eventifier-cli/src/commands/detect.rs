//! Detect command

use clap::{Args, ValueEnum};
use eventifier_core::config::Granularity;
use eventifier_engine::{detect, DetectRequest};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    /// Top-level fields, core rules
    Fields,
    /// Leaf paths, core plus container and noise rules
    Paths,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Fields => Granularity::Fields,
            GranularityArg::Paths => Granularity::Paths,
        }
    }
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Current snapshot: JSON array of user objects
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Field and HMAC key configuration
    #[arg(long, default_value = "config/fields.json")]
    pub config: PathBuf,

    #[arg(long, default_value = "data/baselines")]
    pub baselines: PathBuf,

    #[arg(long, default_value = "data/events.jsonl")]
    pub event_log: PathBuf,

    #[arg(long, default_value = "data/rejected_moves.txt")]
    pub ledger: PathBuf,

    /// Internal campus id (overrides CAMPUS_ID / INTERNAL_CAMPUS_ID)
    #[arg(long)]
    pub campus: Option<i64>,

    #[arg(long, value_enum, default_value = "fields")]
    pub granularity: GranularityArg,
}

pub fn execute(args: DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = DetectRequest {
        snapshot: args.snapshot,
        config: args.config,
        baselines: args.baselines,
        event_log: args.event_log,
        ledger: args.ledger,
        internal_campus_id: super::internal_campus_id(args.campus)?,
        granularity: args.granularity.into(),
    };

    let report = detect(&request)?;
    print!("{}", report);
    Ok(())
}
