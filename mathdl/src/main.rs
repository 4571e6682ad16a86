use colored::Colorize;
use mathdl::commands::command_argument_builder;
use mathdl::handlers::{
    RunArgs, handle_config, handle_list, handle_run, init_tracing, print_banner,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_tracing(verbose);

    // Machine-readable output stays clean
    let json = chosen_command
        .subcommand_matches("run")
        .map(|run| run.get_flag("json"))
        .unwrap_or(false);
    let config_dump = matches!(chosen_command.subcommand(), Some(("config", _)));
    if !quiet && !json && !config_dump {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("run", primary_command)) => handle_run(&RunArgs::from_matches(primary_command, quiet))
            .await
            .map(|_| ()),
        Some(("list", primary_command)) => handle_list(primary_command),
        Some(("config", primary_command)) => handle_config(primary_command),
        None => handle_run(&RunArgs::defaults(quiet)).await.map(|_| ()),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
