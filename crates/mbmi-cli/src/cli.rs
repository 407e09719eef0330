use mbmi_models::EntityKind;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "mbmi.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Sql,
    Config,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Version,
    Sql(SqlArgs),
    ConfigCheck(ConfigCheckArgs),
}

#[derive(Debug, Clone)]
pub struct SqlArgs {
    pub entity: EntityKind,
    pub count: bool,
    pub config: PathBuf,
    pub verbose: bool,
    /// `key=value` request parameters, in order.
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct ConfigCheckArgs {
    pub config: PathBuf,
    pub verbose: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "-V" | "--version" => Ok(Command::Version),
        "sql" => parse_sql(it.map(|s| s.as_str())),
        "config" => parse_config(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_sql<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut entity: Option<EntityKind> = None;
    let mut count = false;
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut verbose = false;
    let mut params = Vec::new();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Sql)),
            "--count" => count = true,
            "-v" | "--verbose" => verbose = true,
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            _ if token.starts_with('-') => anyhow::bail!("unknown option: {token}"),
            _ if token.contains('=') => {
                let (k, v) = token.split_once('=').unwrap_or((token, ""));
                params.push((k.to_string(), v.to_string()));
            }
            _ if entity.is_none() => {
                entity = Some(token.parse().map_err(|e| {
                    anyhow::anyhow!("{e} (expected one of: {})", entity_names())
                })?);
            }
            _ => anyhow::bail!("unexpected argument: {token}"),
        }
    }

    let Some(entity) = entity else {
        anyhow::bail!("missing entity (expected one of: {})", entity_names());
    };

    Ok(Command::Sql(SqlArgs {
        entity,
        count,
        config,
        verbose,
        params,
    }))
}

fn parse_config<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut verbose = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Config)),
            "check" if subcmd.is_none() => subcmd = Some(token),
            "-v" | "--verbose" => verbose = true,
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            _ => anyhow::bail!("unexpected argument: {token}"),
        }
    }

    match subcmd {
        Some("check") => Ok(Command::ConfigCheck(ConfigCheckArgs { config, verbose })),
        _ => Ok(Command::Help(HelpTopic::Config)),
    }
}

fn entity_names() -> String {
    EntityKind::ALL
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
mbmi - mailbox manager API companion

USAGE:
  mbmi <COMMAND> [OPTIONS]

COMMANDS:
  sql           Print the SQL a list request compiles to
  config        Configuration helpers (check)

OPTIONS:
  -h, --help    Print help
  -V, --version Print version

Run `mbmi <command> --help` for more."
            );
        }
        HelpTopic::Sql => {
            println!(
                "\
USAGE:
  mbmi sql <ENTITY> [OPTIONS] [KEY=VALUE ...]

ENTITIES:
  {}

OPTIONS:
  --count               Also print the count statement
  --config <FILE>       Config file path (default: {DEFAULT_CONFIG})
  -v, --verbose         Log at debug level
  -h, --help            Print help

KEY=VALUE pairs are list request parameters, e.g. `email=bob limit=10 sort=id dir=desc`.",
                entity_names()
            );
        }
        HelpTopic::Config => {
            println!(
                "\
USAGE:
  mbmi config check [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: {DEFAULT_CONFIG})
  -v, --verbose         Log at debug level
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_sql_with_params() {
        let cmd = parse_args(&args(&[
            "mbmi",
            "sql",
            "bccs",
            "--count",
            "--config=etc/mbmi.toml",
            "query=ann",
            "sort=id",
            "dir=",
        ]))
        .unwrap();
        let Command::Sql(sql) = cmd else {
            panic!("expected sql");
        };

        assert_eq!(sql.entity, EntityKind::Bccs);
        assert!(sql.count);
        assert!(!sql.verbose);
        assert_eq!(sql.config, PathBuf::from("etc/mbmi.toml"));
        assert_eq!(
            sql.params,
            vec![
                ("query".to_string(), "ann".to_string()),
                ("sort".to_string(), "id".to_string()),
                ("dir".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn parse_sql_requires_known_entity() {
        assert!(parse_args(&args(&["mbmi", "sql"])).is_err());
        let err = parse_args(&args(&["mbmi", "sql", "domains"])).unwrap_err();
        assert!(err.to_string().contains("expected one of"));
        assert!(parse_args(&args(&["mbmi", "sql", "users", "aliases"])).is_err());
        assert!(parse_args(&args(&["mbmi", "sql", "users", "--bogus"])).is_err());
    }

    #[test]
    fn parse_config_check() {
        let cmd = parse_args(&args(&["mbmi", "config", "check", "--config", "x.toml", "-v"])).unwrap();
        let Command::ConfigCheck(check) = cmd else {
            panic!("expected config check");
        };
        assert_eq!(check.config, PathBuf::from("x.toml"));
        assert!(check.verbose);

        assert!(matches!(
            parse_args(&args(&["mbmi", "config"])).unwrap(),
            Command::Help(HelpTopic::Config)
        ));
    }

    #[test]
    fn parse_top_level() {
        assert!(matches!(
            parse_args(&args(&["mbmi"])).unwrap(),
            Command::Help(HelpTopic::Root)
        ));
        assert!(matches!(
            parse_args(&args(&["mbmi", "--version"])).unwrap(),
            Command::Version
        ));
        assert!(parse_args(&args(&["mbmi", "serve"])).is_err());
    }
}
