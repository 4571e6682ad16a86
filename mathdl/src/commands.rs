use crate::CLAP_STYLING;
use clap::{ArgAction, arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("mathdl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("mathdl")
        .about("Probe, download and archive math competition papers")
        .after_help(
            "Without a subcommand, every configured instance is run in the current directory.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every request to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("run")
                .about(
                    "Probe every candidate, download the ones that exist, then archive them and \
                log the rest",
                )
                .arg(instance_arg())
                .arg(config_arg())
                .arg(
                    arg!(-o --"output-dir" <DIR>)
                        .required(false)
                        .help("Directory that receives documents, archives and logs")
                        .default_value("."),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the run reports as JSON instead of a text summary")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("list")
                .about("Print every candidate URL and its local path without touching the network")
                .arg(instance_arg())
                .arg(config_arg()),
        )
        .subcommand(
            command!("config")
                .about("Print the effective configuration as JSON")
                .arg(config_arg()),
        )
}

fn instance_arg() -> clap::Arg {
    arg!(-i --"instance" <NAME>)
        .required(false)
        .help("Only run this instance (repeatable, default: all)")
        .action(ArgAction::Append)
}

fn config_arg() -> clap::Arg {
    arg!(-c --"config" <PATH>)
        .required(false)
        .help("JSON configuration file replacing the built-in instances")
        .value_parser(clap::value_parser!(std::path::PathBuf))
}
