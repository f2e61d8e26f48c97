//! Classify command: review a queued event file

use clap::Args;
use eventifier_core::render::render_summary;
use eventifier_engine::{review_file, ReviewOptions};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Event queue, one JSON entry per line
    #[arg(long)]
    pub queue: PathBuf,

    /// Stop after this many entries
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only show entries that produced no label
    #[arg(long)]
    pub unknown_only: bool,

    /// Internal campus id (overrides CAMPUS_ID / INTERNAL_CAMPUS_ID)
    #[arg(long)]
    pub campus: Option<i64>,
}

pub fn execute(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = ReviewOptions {
        internal_campus_id: super::internal_campus_id(args.campus)?,
        limit: args.limit,
        unknown_only: args.unknown_only,
    };

    let (reviewed, skipped) = review_file(&args.queue, &options)?;
    for entry in &reviewed {
        println!("{}", render_summary(&entry.header, &entry.classification));
    }
    println!("{} entries shown, {} queue lines skipped", reviewed.len(), skipped);
    Ok(())
}
