use clap::Parser;
use miette::Result;
use pxbase::cli::{Cli, Commands};
use pxbase::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new().with_verbose(cli.verbose);

    match cli.command {
        Commands::Build(args) => pxbase::cli::build::run(args, &printer)?,
        Commands::Check(args) => pxbase::cli::check::run(args, &printer)?,
        Commands::Preview(args) => pxbase::cli::preview::run(args, &printer)?,
        Commands::Completions(args) => pxbase::cli::completions::run(args)?,
    }

    Ok(())
}
