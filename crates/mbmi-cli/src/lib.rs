mod cli;
pub mod config;
mod config_cmd;
mod logging;
mod sql_cmd;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Version => {
            println!("mbmi {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        cli::Command::Sql(args) => sql_cmd::run(args),
        cli::Command::ConfigCheck(args) => config_cmd::run(args),
    }
}
