use mbmi_models::DEFAULT_LIMIT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl AppConfig {
    /// Read, expand and validate a config file.
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!("invalid config file {}: {e:#}", config_path.display())
        })?;

        Ok(Self { config_path, file })
    }

    /// Load `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            return Self::load(path.to_path_buf());
        }
        Ok(Self {
            config_path: path.to_path_buf(),
            file: ConfigFile::default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub paging: PagingConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            log: LogConfig::default(),
            paging: PagingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    pub assets: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            assets: "/usr/share/mbmi/assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            name: "mail".to_string(),
            user: "nobody".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// MySQL driver DSN.
    pub fn dsn(&self) -> String {
        self.render_dsn(&self.password)
    }

    /// [`DatabaseConfig::dsn`] with the password masked, for logs and output.
    pub fn redacted_dsn(&self) -> String {
        if self.password.is_empty() {
            self.render_dsn("")
        } else {
            self.render_dsn("***")
        }
    }

    fn render_dsn(&self, password: &str) -> String {
        format!(
            "{}:{}@tcp({})/{}?charset=utf8&parseTime=True&loc=Local",
            self.user, password, self.host, self.name
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_limit: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        self.server.listen = expand_env_vars(&self.server.listen)?;
        self.server.assets = expand_env_vars(&self.server.assets)?;

        let db = &mut self.database;
        for field in [&mut db.host, &mut db.name, &mut db.user, &mut db.password] {
            *field = expand_env_vars(field)?;
        }

        self.log.level = expand_env_vars(&self.log.level)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        if self.server.listen.trim().is_empty() {
            anyhow::bail!("server.listen must not be empty");
        }

        let db = &self.database;
        for (key, value) in [("host", &db.host), ("name", &db.name), ("user", &db.user)] {
            if value.trim().is_empty() {
                anyhow::bail!("database.{key} must not be empty");
            }
        }

        if self.paging.default_limit == 0 {
            anyhow::bail!("paging.default_limit must be greater than 0");
        }

        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
