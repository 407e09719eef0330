use crate::cli::ConfigCheckArgs;
use crate::config::AppConfig;
use crate::logging;

pub fn run(args: ConfigCheckArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load(args.config)?;
    logging::init(&cfg.file.log.level, args.verbose);
    tracing::debug!(path = %cfg.config_path.display(), "config loaded");

    let file = &cfg.file;
    println!("config ok: {}", cfg.config_path.display());
    println!("  listen:         {}", file.server.listen);
    println!("  assets:         {}", file.server.assets);
    println!("  database:       {}", file.database.redacted_dsn());
    println!("  log level:      {}", file.log.level);
    println!("  default limit:  {}", file.paging.default_limit);
    Ok(())
}
