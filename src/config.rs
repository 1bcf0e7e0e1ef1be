use ::config::{Config, Environment, File};
use handle_errors::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE_FILE: &str = "notes.db";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Args {
    pub log_level: String,
    pub port: u16,
    pub database_path: Option<String>,
    pub db_connection_file: Option<String>,
    pub frontend_origins: Vec<String>,
    pub cors_allow_any_origin: bool,
}

impl Args {
    /// Layers defaults, the optional `<name>.toml` file and `NOTES_*` environment variables.
    pub fn load(name: &str) -> Result<Self, Error> {
        let config = Config::builder()
            .set_default("log_level", "info")?
            .set_default("port", 8000)?
            .set_default(
                "frontend_origins",
                vec!["http://localhost:3000", "http://127.0.0.1:3000"],
            )?
            .set_default("cors_allow_any_origin", false)?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("NOTES").try_parsing(true))
            .build()?;

        let args = config.try_deserialize::<Args>()?;
        args.validate_origins()?;
        Ok(args)
    }

    pub fn validate_origins(&self) -> Result<(), Error> {
        for origin in &self.frontend_origins {
            if !is_valid_origin(origin) {
                return Err(Error::InvalidOrigin(origin.clone()));
            }
        }
        Ok(())
    }

    /// Where the notes database lives: `database_path`, else the file named by a
    /// connection descriptor, else `notes.db`. The parent directory must exist.
    pub fn resolve_database_path(&self) -> Result<PathBuf, Error> {
        let path = match (&self.database_path, &self.db_connection_file) {
            (Some(path), _) => PathBuf::from(path),
            (None, Some(descriptor)) => {
                let contents = std::fs::read_to_string(descriptor)?;
                match parse_db_connection(&contents) {
                    Some(path) => PathBuf::from(path),
                    None => {
                        return Err(Error::InvalidDatabasePath(format!(
                            "no `File path:` or `Connection string:` line in {}",
                            descriptor
                        )))
                    }
                }
            }
            (None, None) => PathBuf::from(DEFAULT_DATABASE_FILE),
        };

        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(Error::InvalidDatabasePath(format!(
                "directory {} does not exist",
                parent.display()
            )));
        }
        Ok(path)
    }
}

/// Extracts the SQLite file path from a connection descriptor such as
///
/// ```text
/// # written by the database container
/// File path: /data/notes.db
/// Connection string: sqlite:////data/notes.db
/// ```
///
/// The first usable line wins. Comments and blank lines are skipped.
pub fn parse_db_connection(contents: &str) -> Option<String> {
    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = match line.split_once(':') {
            Some((key, value)) => (key.trim().to_ascii_lowercase(), value.trim()),
            None => continue,
        };
        if key == "file path" && !value.is_empty() {
            return Some(value.to_string());
        }
        if key == "connection string" {
            if let Some(rest) = value.strip_prefix("sqlite:////") {
                return Some(format!("/{}", rest));
            }
        }
    }
    None
}

fn is_valid_origin(origin: &str) -> bool {
    let rest = match origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    {
        Some(rest) => rest,
        None => return false,
    };
    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (rest, None),
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let port_ok = port.map_or(true, |p| p.parse::<u16>().is_ok());
    host_ok && port_ok
}
