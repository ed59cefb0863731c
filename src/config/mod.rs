use crate::errors::{AppError, AppResult};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// How a load run commits its chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    /// Every flushed chunk is committed on its own; a failure keeps earlier chunks.
    #[default]
    Chunked,
    /// The whole run is staged in one transaction and committed only on success.
    AllOrNothing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_max_probe_lines")]
    pub max_probe_lines: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub ingest_mode: IngestMode,
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}
fn default_chunk_size() -> usize {
    10_000
}
fn default_max_probe_lines() -> usize {
    20
}
fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            timezone: default_timezone(),
            chunk_size: default_chunk_size(),
            max_probe_lines: default_max_probe_lines(),
            delimiter: default_delimiter(),
            ingest_mode: IngestMode::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rglucologger")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rglucologger")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rglucologger.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rglucologger.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve the configured IANA timezone name.
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(self.timezone.clone()))
    }

    /// The CSV delimiter as the single byte the csv reader expects.
    pub fn delimiter_byte(&self) -> AppResult<u8> {
        parse_delimiter(&self.delimiter)
    }

    /// Initialize configuration and database files.
    /// Returns the database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("rglucologger.sqlite")
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}

/// Accepts a single ASCII character, or the names `tab` / `semicolon`.
pub fn parse_delimiter(raw: &str) -> AppResult<u8> {
    match raw {
        "tab" | "\\t" => Ok(b'\t'),
        "semicolon" => Ok(b';'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => Err(AppError::Config(format!(
            "Invalid delimiter '{}': expected a single ASCII character",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.timezone, "Europe/Berlin");
        assert_eq!(cfg.chunk_size, 10_000);
        assert_eq!(cfg.max_probe_lines, 20);
        assert_eq!(cfg.delimiter, ",");
        assert_eq!(cfg.ingest_mode, IngestMode::Chunked);
    }

    #[test]
    fn ingest_mode_reads_snake_case() {
        let cfg: Config =
            serde_yaml::from_str("database: x\ningest_mode: all_or_nothing\n").unwrap();
        assert_eq!(cfg.ingest_mode, IngestMode::AllOrNothing);
    }

    #[test]
    fn timezone_must_be_a_known_zone() {
        let mut cfg = Config::default();
        assert!(cfg.tz().is_ok());
        cfg.timezone = "Mars/Olympus".into();
        assert!(matches!(cfg.tz(), Err(AppError::InvalidTimezone(_))));
    }

    #[test]
    fn delimiter_parsing() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("semicolon").unwrap(), b';');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
