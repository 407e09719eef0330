use crate::cli::SqlArgs;
use crate::config::{AppConfig, ConfigFile};
use crate::logging;
use anyhow::Context;
use mbmi_models::RequestParams;

pub fn run(args: SqlArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default(&args.config)?;
    logging::init(&cfg.file.log.level, args.verbose);

    println!("{}", render(&args, &cfg.file)?);
    Ok(())
}

/// Compile the listing described by `args` to pretty JSON.
fn render(args: &SqlArgs, cfg: &ConfigFile) -> anyhow::Result<String> {
    let params: RequestParams = args.params.iter().cloned().collect();
    tracing::debug!(entity = %args.entity, ?params, "planning listing");

    let plan = args
        .entity
        .plan(&params, cfg.paging.default_limit, args.count)
        .with_context(|| format!("cannot compile {} listing", args.entity))?;

    plan.rows.check_placeholders()?;
    if let Some(count) = &plan.count {
        count.check_placeholders()?;
    }

    Ok(serde_json::to_string_pretty(&plan)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbmi_models::EntityKind;
    use std::path::PathBuf;

    fn sql_args(entity: EntityKind, count: bool, params: &[(&str, &str)]) -> SqlArgs {
        SqlArgs {
            entity,
            count,
            config: PathBuf::from("missing.toml"),
            verbose: false,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn renders_rows_and_count() {
        let args = sql_args(EntityKind::Users, true, &[("email", "bob"), ("limit", "5")]);
        let json: serde_json::Value =
            serde_json::from_str(&render(&args, &ConfigFile::default()).unwrap()).unwrap();

        assert!(
            json["rows"]["sql"]
                .as_str()
                .unwrap()
                .ends_with("LIKE ? LIMIT ?,?")
        );
        assert_eq!(json["rows"]["args"], serde_json::json!(["bob%", 0, 5]));
        assert_eq!(json["count"]["args"], serde_json::json!(["bob%"]));
    }

    #[test]
    fn uses_configured_page_size() {
        let mut cfg = ConfigFile::default();
        cfg.paging.default_limit = 7;
        let args = sql_args(EntityKind::Transports, false, &[]);
        let json: serde_json::Value =
            serde_json::from_str(&render(&args, &cfg).unwrap()).unwrap();

        assert_eq!(json["rows"]["args"], serde_json::json!([0, 7]));
        assert!(json.get("count").is_none());
    }

    #[test]
    fn unknown_directive_is_reported() {
        let args = sql_args(EntityKind::Aliases, false, &[("sort", "passwd")]);
        let err = render(&args, &ConfigFile::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported filter argument: passwd"));
    }
}
