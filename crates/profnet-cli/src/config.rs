use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use profnet_db::Database;

pub const DEFAULT_DB_PATH: &str = "profnet.db";

/// Used when `RUST_LOG` is unset: only our own crates, warnings and up.
pub const DEFAULT_LOG_FILTER: &str = "profnet=warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Read settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("PROFNET_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.into());

        Self {
            db_path: PathBuf::from(db_path),
        }
    }

    /// Open the configured database, announcing it on `out`. The prefix is
    /// flushed before opening so it shows up ahead of any error report.
    pub fn connect<W: Write>(&self, out: &mut W) -> Result<Database> {
        write!(out, "Connecting to database...")?;
        out.flush()?;

        let db = Database::open(&self.db_path).with_context(|| {
            format!(
                "Unable to connect to database at {}",
                self.db_path.display()
            )
        })?;

        writeln!(out, "Done")?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset_or_blank() {
        let cfg = Config::from_lookup(|_| None);
        assert_eq!(cfg.db_path, PathBuf::from(DEFAULT_DB_PATH));

        let cfg = Config::from_lookup(|_| Some("  ".into()));
        assert_eq!(cfg.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn reads_db_path() {
        let cfg = Config::from_lookup(|key| {
            (key == "PROFNET_DB_PATH").then(|| "/var/lib/profnet/net.db".to_string())
        });
        assert_eq!(cfg.db_path, PathBuf::from("/var/lib/profnet/net.db"));
    }

    #[test]
    fn default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    /// Remembers how much output had been flushed.
    #[derive(Default)]
    struct Recorder {
        buf: Vec<u8>,
        flushed: usize,
    }

    impl Write for Recorder {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed = self.buf.len();
            Ok(())
        }
    }

    #[test]
    fn connect_flushes_prefix_before_failing() {
        let missing = std::env::temp_dir()
            .join(format!("profnet-missing-{}", std::process::id()))
            .join("net.db");
        let cfg = Config { db_path: missing };

        let mut out = Recorder::default();
        let Err(err) = cfg.connect(&mut out) else {
            panic!("opened a database in a missing directory");
        };

        assert!(err.to_string().starts_with("Unable to connect to database at"));
        assert_eq!(&out.buf[..out.flushed], b"Connecting to database...");
        assert_eq!(out.buf.len(), out.flushed);
    }

    #[test]
    fn connect_reports_done() {
        let dir = std::env::temp_dir().join(format!("profnet-connect-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cfg = Config { db_path: dir.join("net.db") };

        let mut out = Vec::new();
        let db = cfg.connect(&mut out).unwrap();
        assert!(!db.user_exists("alice").unwrap());
        assert_eq!(out, b"Connecting to database...Done\n");

        drop(db);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
