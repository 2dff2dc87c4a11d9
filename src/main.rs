// Entrypoint for the CLI application.
// - Keeps `main` small: parse the flags, load the config, hand off to the
//   ui flows.
// - Returns `anyhow::Result` so failures land on stderr with exit code 1.

use clap::Parser;
use fbin::{api::Filebin, config::Config, ui};

/// Upload files to a filebin-style sharing service, or delete them again.
///
/// Arguments may be local paths, http(s) urls (fetched and re-uploaded),
/// or `-` for standard input. With no arguments, standard input is
/// uploaded.
#[derive(Parser)]
#[command(name = "fbin", version)]
struct Cli {
    /// Delete a file by id or url, instead of uploading
    #[arg(short = 'd', long = "delete")]
    delete: bool,

    /// Files, urls, or `-` for standard input
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fb = Filebin::new(Config::load()?)?;

    if cli.delete {
        ui::delete(&fb, &cli.args)
    } else {
        ui::upload(&fb, &cli.args)
    }
}
