use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许跨域的前端地址；为空时放行所有来源
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    /// 每获得 1 积分所需的订单金额(分)
    pub earn_unit: i64,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            earn_unit: 1_000_000,
        }
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| {
                    AppError::ConfigError(format!("Failed to parse {config_path}: {e}"))
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = get_env("DATABASE_URL")
                    .ok_or_else(|| {
                    AppError::ConfigError(format!(
                        "DATABASE_URL is not set and {config_path} was not found"
                    ))
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                        cors_origins: Vec::new(),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    loyalty: LoyaltyConfig::default(),
                }
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Failed to read {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = get_env("SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = p;
        }
        if let Some(v) = get_env("CORS_ORIGINS") {
            self.server.cors_origins = split_origins(&v);
        }
        if let Some(v) = get_env("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = get_env("DB_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.max_connections = mc;
        }
        if let Some(v) = get_env("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Some(n) = get_env("JWT_ACCESS_EXPIRES_IN").and_then(|v| v.parse().ok()) {
            self.jwt.access_token_expires_in = n;
        }
        if let Some(n) = get_env("JWT_REFRESH_EXPIRES_IN").and_then(|v| v.parse().ok()) {
            self.jwt.refresh_token_expires_in = n;
        }
        if let Some(n) = get_env("LOYALTY_EARN_UNIT").and_then(|v| v.parse().ok()) {
            self.loyalty.earn_unit = n;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.loyalty.earn_unit <= 0 {
            return Err(AppError::ConfigError(
                "loyalty.earn_unit must be greater than 0".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::ConfigError(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_with_default_loyalty() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.loyalty.earn_unit, 1_000_000);
        assert!(config.server.cors_origins.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("https://pos.example.com, ,http://localhost:5173"),
            vec!["https://pos.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_reject_non_positive_earn_unit() {
        let mut config: Config = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            [database]
            url = "sqlite::memory:"
            max_connections = 1
            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120
            [loyalty]
            earn_unit = 500
        "#,
        )
        .unwrap();
        assert_eq!(config.loyalty.earn_unit, 500);
        config.loyalty.earn_unit = 0;
        assert!(matches!(
            config.validate(),
            Err(AppError::ConfigError(msg)) if msg == "loyalty.earn_unit must be greater than 0"
        ));
        config.loyalty.earn_unit = 500;
        config.database.max_connections = 0;
        assert!(matches!(
            config.validate(),
            Err(AppError::ConfigError(msg)) if msg == "database.max_connections must be greater than 0"
        ));
    }
}
