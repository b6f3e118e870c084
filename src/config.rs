use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;
use validator::Validate;

const DEFAULT_HH_API_BASE_URL: &str = "https://api.hh.ru";
const DEFAULT_HH_USER_AGENT: &str = "HH-API-Student-Project";

/// An employer whose profile and vacancies are harvested at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmployerTarget {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub id: i64,
}

impl EmployerTarget {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_name: String,
    pub database_user: String,
    pub database_password: String,
    pub database_host: String,
    pub database_port: u16,
    pub hh_api_base_url: String,
    pub hh_user_agent: String,
    pub vacancies_per_page: u32,
    pub fetch_delay: Duration,
    pub reset_database: bool,
    pub employers: Vec<EmployerTarget>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_process_env()
    }

    /// Reads the process environment only, without loading `.env`.
    pub fn from_process_env() -> Result<Self> {
        let hh_api_base_url = get_env_or("HH_API_BASE_URL", DEFAULT_HH_API_BASE_URL);
        Url::parse(&hh_api_base_url)
            .map_err(|e| Error::Config(format!("Invalid value for HH_API_BASE_URL: {}", e)))?;

        let employers = match env::var("EMPLOYERS_FILE") {
            Ok(path) => load_employer_targets(&path)?,
            Err(_) => default_employers(),
        };

        Ok(Self {
            database_name: get_env("DATABASE_NAME")?,
            database_user: get_env("DATABASE_USER")?,
            database_password: get_env("DATABASE_PASSWORD")?,
            database_host: get_env_or("DATABASE_HOST", "localhost"),
            database_port: get_env_parse_or("DATABASE_PORT", 5432)?,
            hh_api_base_url,
            hh_user_agent: get_env_or("HH_USER_AGENT", DEFAULT_HH_USER_AGENT),
            vacancies_per_page: get_env_parse_or("HH_VACANCIES_PER_PAGE", 100)?,
            fetch_delay: Duration::from_millis(get_env_parse_or("FETCH_DELAY_MS", 100)?),
            reset_database: get_env_parse_or("RESET_DATABASE", false)?,
            employers,
        })
    }
}

/// The employers harvested when no `EMPLOYERS_FILE` is configured.
pub fn default_employers() -> Vec<EmployerTarget> {
    vec![
        EmployerTarget::new("Yandex", 1740),
        EmployerTarget::new("Sber", 3529),
        EmployerTarget::new("VK", 15478),
        EmployerTarget::new("Tinkoff", 78638),
        EmployerTarget::new("Ozon", 2180),
        EmployerTarget::new("Wildberries", 87021),
        EmployerTarget::new("Gazprom", 39305),
        EmployerTarget::new("Alfa-Bank", 80),
        EmployerTarget::new("Rostelecom", 2748),
        EmployerTarget::new("MTS", 3776),
    ]
}

pub fn load_employer_targets(path: &str) -> Result<Vec<EmployerTarget>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read EMPLOYERS_FILE {}: {}", path, e)))?;
    parse_employer_targets(&raw)
}

/// Parses a JSON array of `{ "name": ..., "id": ... }` objects.
pub fn parse_employer_targets(raw: &str) -> Result<Vec<EmployerTarget>> {
    let targets: Vec<EmployerTarget> = serde_json::from_str(raw)?;
    if targets.is_empty() {
        return Err(Error::Config("Employer list is empty".to_string()));
    }
    for target in &targets {
        target.validate()?;
    }
    Ok(targets)
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
