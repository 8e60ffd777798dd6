//! Query entity values of a local BIDS dataset
//!
//! Lists subjects, sessions and datatypes of a dataset, then the values of
//! one entity (default: `recording`), and finally prints the report.
//!
//! Usage:
//!   entity_values <bids_root> [entity]
//!
//! Example:
//!   entity_values ~/mne_data/ds003848 recording

use bids_report::Dataset;
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <bids_root> [entity]", args[0]);
        std::process::exit(1);
    }

    let root = PathBuf::from(&args[1]);
    let entity = args.get(2).map(String::as_str).unwrap_or("recording");

    let dataset = match Dataset::open(&root) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error opening dataset: {}", e);
            std::process::exit(1);
        }
    };

    let query = || -> bids_report::Result<()> {
        println!("Subjects:  {:?}", dataset.subjects()?);
        println!("Sessions:  {:?}", dataset.sessions()?);
        println!("Datatypes: {:?}", dataset.datatypes()?);
        println!("{}: {:?}", entity, dataset.entity_values(entity)?);
        println!("\n{}", dataset.report()?);
        Ok(())
    };

    if let Err(e) = query() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
