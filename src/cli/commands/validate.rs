//! Outline validation command
//!
//! Loads the outline with the same schema rules as a report run and prints
//! its shape, without running any command.

use crate::cli::{Output, RunArgs};
use crate::outline::{self, AcquisitionMode, Section};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Print the section tree
    #[arg(long)]
    pub tree: bool,
}

/// Execute the validate command
pub async fn execute(args: ValidateArgs, run: &RunArgs, output: &Output) -> Result<()> {
    let outline = outline::load(&run.config)?;

    let mode = match &run.collector {
        Some(root) => AcquisitionMode::Collector(root.clone()),
        None => AcquisitionMode::Live,
    };

    output.header(&format!("Outline {}", run.config.display()));
    output.key_value("Sections:", &outline.node_count().to_string());
    output.key_value("Rendered:", &outline.rendered_count().to_string());
    output.key_value("Acquisitions:", &count_acquisitions(&outline, &mode).to_string());

    if args.tree {
        print_tree(&outline, 0, output);
    }

    output.success("Outline is valid");
    Ok(())
}

/// Acquisitions that a run in `mode` would perform
fn count_acquisitions(section: &Section, mode: &AcquisitionMode) -> usize {
    if !section.enabled {
        return 0;
    }
    section.acquisitions(mode).len()
        + section
            .sections
            .iter()
            .map(|child| count_acquisitions(child, mode))
            .sum::<usize>()
}

fn print_tree(section: &Section, depth: usize, output: &Output) {
    output.tree_item(depth, &section.title, section.enabled);
    for child in &section.sections {
        print_tree(child, depth + 1, output);
    }
}
