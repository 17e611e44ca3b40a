use clap::Parser;
use csv_adapter::cli::{
    args::{Args, Commands},
    commands,
};
use std::process;

fn main() {
    let args = Args::parse();

    let result = match &args.command {
        Commands::Run(run_args) => commands::run(run_args),
        Commands::Check(check_args) => commands::check(check_args),
    };

    match result {
        Ok(_summary) => {
            // Success - the summary has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
