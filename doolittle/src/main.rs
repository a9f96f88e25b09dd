mod args;
mod pipeline;

use args::{Cli, SubCommands};
use pipeline::{run_gotoh, run_msa, run_nw, run_score, run_tree, run_triple};

use clap::Parser;
use colored::Colorize;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

fn run(cli: &Cli) -> anyhow::Result<String> {
    let format = cli.common_args.format();

    match &cli.command {
        SubCommands::Nw(args) => run_nw(args, format),
        SubCommands::Gotoh(args) => run_gotoh(args, format),
        SubCommands::Triple(args) => run_triple(args, format),
        SubCommands::Msa(args) => run_msa(args, format),
        SubCommands::Tree(args) => run_tree(args, format),
        SubCommands::Score(args) => run_score(args, format),
    }
}

fn main() {
    color_backtrace::install();

    let cli = Cli::parse();

    // only fails when a logger is already set
    let _ = TermLogger::init(
        cli.common_args.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    match run(&cli) {
        Ok(report) => print!("{report}"),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
