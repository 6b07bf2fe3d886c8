use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use services::RandomSource;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Multiple-choice quiz server")]
pub struct Cli {
    /// `SQLite` database holding stats and preferences.
    #[arg(
        long = "db",
        env = "QUIZ_DB_URL",
        default_value = "sqlite:quiz.sqlite3",
        global = true
    )]
    pub db_url: String,

    /// JSON question bank.
    #[arg(
        long,
        env = "QUIZ_QUESTIONS",
        default_value = "questions.json",
        global = true
    )]
    pub questions: PathBuf,

    #[arg(long, env = "QUIZ_HOST", default_value_t = DEFAULT_HOST, global = true)]
    pub host: IpAddr,

    #[arg(long, env = "QUIZ_PORT", default_value_t = 3000, global = true)]
    pub port: u16,

    /// Fixed seed for shuffling and selection; random when omitted.
    #[arg(long, env = "QUIZ_SEED", global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the JSON API (default).
    Serve,
    /// Print the current stats summary as JSON.
    Summary,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub fn random(&self) -> RandomSource {
        self.seed
            .map_or_else(RandomSource::default_source, RandomSource::seeded)
    }

    #[must_use]
    pub fn database_url(&self) -> String {
        normalize_sqlite_url(&self.db_url)
    }
}

pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns an error if the URL is not a `sqlite://` file URL or the file
/// cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_memory_and_full_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.sqlite3"),
            "sqlite:///tmp/quiz.sqlite3"
        );
    }

    #[test]
    fn normalize_makes_relative_paths_absolute() {
        let url = normalize_sqlite_url("sqlite:data/quiz.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.sqlite3"));

        assert_eq!(
            normalize_sqlite_url("/var/quiz.sqlite3"),
            "sqlite:///var/quiz.sqlite3"
        );
    }

    #[test]
    fn prepare_rejects_non_file_urls() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("postgres://db").is_err());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["quiz"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.port, 3000);
        assert!(!cli.random().is_seeded());

        let cli = Cli::try_parse_from(["quiz", "summary", "--seed", "7"]).unwrap();
        assert_eq!(cli.command(), Command::Summary);
        assert!(cli.random().is_seeded());
    }
}
