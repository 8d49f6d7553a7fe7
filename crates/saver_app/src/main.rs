mod cli;
mod driver;
mod logging;
mod prefs_file;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    logging::initialize(args.log.into());

    let prefs = prefs_file::load_preferences(&args.prefs);
    match args.command {
        cli::Command::Save { page, out } => driver::run_save(&page, &out, &args.staging, prefs),
        cli::Command::Confirm { url, out } => {
            driver::run_confirm(&url, &out, &args.staging, prefs)
        }
        cli::Command::Prefs {
            theme,
            format,
            storage,
        } => driver::run_prefs(&args.prefs, prefs, theme, format, storage),
    }
}
