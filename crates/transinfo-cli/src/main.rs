//! Translation info generator entry point.
//!
//! ```sh
//! generate-translation-info --desc TranslationDescription.json --output TranslationInfo.inc
//! ```

use std::path::PathBuf;

use clap::Parser;
use cmcl_transinfo::{Conventions, translate_file};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "generate-translation-info")]
#[command(about = "Generate translation code from JSON description")]
struct Cli {
    /// JSON file with a description
    #[arg(long, value_name = "<input>.json")]
    desc: PathBuf,

    /// Output file
    #[arg(long, value_name = "<output>.inc")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("generate_translation_info=info".parse()?)
                .add_directive("cmcl_transinfo=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!(
        "Generating {} from {}",
        cli.output.display(),
        cli.desc.display()
    );
    translate_file(&cli.desc, &cli.output, &Conventions::default())?;

    Ok(())
}
