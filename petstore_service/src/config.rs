use anyhow::Context;
pub use petstore_env::Environment;

pub struct Config {
    /// port number of service
    pub port: u16,
    /// The environment we are in
    pub environment: Environment,
    /// The connection URL for the sqlite database this application should use.
    pub database_url: String,
    /// HMAC secret the access tokens are signed with
    pub jwt_secret: String,
    /// Lifetime of an issued access token
    pub jwt_expiration_seconds: u64,
    /// Create the default admin and user accounts when the user table is empty
    pub seed_default_users: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), Environment::new_or_prod())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        environment: Environment,
    ) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or("8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or("sqlite://petstore.db?mode=rwc".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .context("JWT_SECRET must be provided")?;

        let jwt_expiration_seconds = lookup("JWT_EXPIRATION_SECONDS")
            .unwrap_or("86400".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRATION_SECONDS must be a number of seconds")?;

        let seed_default_users = lookup("SEED_DEFAULT_USERS")
            .unwrap_or("false".to_string())
            .parse::<bool>()
            .context("SEED_DEFAULT_USERS must be true or false")?;

        Ok(Config {
            port,
            environment,
            database_url,
            jwt_secret,
            jwt_expiration_seconds,
            seed_default_users,
        })
    }

    #[cfg(test)]
    pub fn new_testing() -> Self {
        Config {
            port: 0,
            environment: Environment::Local,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "testing".to_string(),
            jwt_expiration_seconds: 3600,
            seed_default_users: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned(), Environment::Local)
    }

    #[test]
    fn it_applies_defaults() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite://petstore.db?mode=rwc");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expiration_seconds, 86400);
        assert!(!config.seed_default_users);
        assert_eq!(config.environment, Environment::Local);
    }

    #[test]
    fn it_reads_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_SECONDS", "60"),
            ("SEED_DEFAULT_USERS", "true"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.jwt_expiration_seconds, 60);
        assert!(config.seed_default_users);
    }

    #[test]
    fn it_requires_a_secret() {
        let err = config_from(&[]).err().unwrap();
        assert_eq!(err.to_string(), "JWT_SECRET must be provided");

        assert!(config_from(&[("JWT_SECRET", "")]).is_err());
    }

    #[test]
    fn it_rejects_malformed_numbers() {
        let err = config_from(&[("JWT_SECRET", "s3cret"), ("PORT", "eighty")])
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "PORT must be a valid port number");
    }
}
