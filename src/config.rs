use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use serde::Deserialize;

use crate::validation::{is_valid_email, normalize_email};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials of the admin account created at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    /// Argon2 time cost (iterations).
    pub hash_work_factor: u32,
    pub admin: Option<AdminSeed>,
}

impl AdminSeed {
    /// Rejects an email that login would refuse, so the seeded admin can
    /// always sign in.
    pub fn new(email: &str, password: String) -> anyhow::Result<Self> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            anyhow::bail!("ADMIN_EMAIL {email:?} is not a valid email address");
        }
        if password.is_empty() {
            anyhow::bail!("ADMIN_PASSWORD must not be empty");
        }
        Ok(Self { email, password })
    }
}

pub const DEFAULT_HASH_WORK_FACTOR: u32 = 10;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "storefront-users".into()),
            ttl_minutes: parse_var("JWT_TTL_MINUTES")?.unwrap_or(60),
        };

        let admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed::new(&email, password)?),
            (Err(_), Err(_)) => None,
            _ => anyhow::bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")?.unwrap_or(10),
            jwt,
            hash_work_factor: parse_var("HASH_WORK_FACTOR")?.unwrap_or(DEFAULT_HASH_WORK_FACTOR),
            admin,
        })
    }
}

/// `None` when unset; an error when set but unparseable.
fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{key}={raw:?} is invalid: {e}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_seed_requires_a_loginable_email() {
        let seed = AdminSeed::new("  Admin@Example.com ", "admin-pass".into()).unwrap();
        assert_eq!(seed.email, "admin@example.com");

        let err = AdminSeed::new("admin@localhost", "admin-pass".into()).unwrap_err();
        assert!(err.to_string().contains("ADMIN_EMAIL"));
        assert!(AdminSeed::new("admin@example.com", String::new()).is_err());
    }

    #[test]
    fn parse_var_distinguishes_unset_from_invalid() {
        std::env::set_var("STOREFRONT_TEST_WORK_FACTOR_OK", " 12 ");
        std::env::set_var("STOREFRONT_TEST_WORK_FACTOR_BAD", "ten");

        assert_eq!(
            parse_var::<u32>("STOREFRONT_TEST_WORK_FACTOR_OK").unwrap(),
            Some(12)
        );
        assert_eq!(parse_var::<u32>("STOREFRONT_TEST_WORK_FACTOR_UNSET").unwrap(), None);
        let err = parse_var::<u32>("STOREFRONT_TEST_WORK_FACTOR_BAD").unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_TEST_WORK_FACTOR_BAD"));
    }
}
