use crate::cli::Output;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(long)]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs, output: &Output) -> Result<()> {
    println!("{} {}", crate::PKG_NAME, crate::VERSION);

    if args.detailed {
        output.key_value("Description:", crate::PKG_DESCRIPTION);
        output.key_value("License:", env!("CARGO_PKG_LICENSE"));
        output.key_value("Rust edition:", "2024");
        output.key_value(
            "Profile:",
            if cfg!(debug_assertions) { "debug" } else { "release" },
        );
    }
    Ok(())
}
