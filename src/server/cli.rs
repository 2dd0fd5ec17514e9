//! Command line and environment configuration of `adserver`.
// PostgreSQL connection options are parsed in every build but only read with the `pg` feature.
#![cfg_attr(not(feature = "pg"), allow(dead_code))]

use std::net::SocketAddr;
use std::path::PathBuf;

use fieldx::fxstruct;
use garde::Validate;

#[derive(Debug, Clone, clap::Parser, Validate)]
#[fxstruct(no_new, get(copy))]
#[clap(about, version, name = "adserver")]
pub(crate) struct Cli {
    /// Address to listen on.
    #[clap(long, env = "ADCATALOG_BIND", default_value = "0.0.0.0:8080")]
    #[garde(skip)]
    bind: SocketAddr,

    /// Path to the SQLite database file. Created if missing.
    #[clap(long, env = "ADCATALOG_SQLITE_PATH", default_value = "ad.db")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    sqlite_path: PathBuf,

    /// Use PostgreSQL instead of SQLite.
    #[clap(long, env = "ADCATALOG_PG", default_value_t = false)]
    #[garde(custom(Self::feature_enabled(cfg!(feature = "pg"), "pg")))]
    pg: bool,

    #[clap(long, env = "ADCATALOG_PG_HOST", default_value = "localhost")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    pg_host: String,

    #[clap(long, env = "ADCATALOG_PG_PORT", default_value_t = 5432)]
    #[garde(skip)]
    pg_port: u16,

    #[clap(long, env = "ADCATALOG_PG_USER", default_value = "adcatalog")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    pg_user: String,

    #[clap(long, env = "ADCATALOG_PG_PASSWORD", hide_env_values = true, default_value = "adcatalog")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    pg_password: String,

    #[clap(long, env = "ADCATALOG_PG_DATABASE", default_value = "adcatalog")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    pg_database: String,

    /// Seconds between two catalog refreshes.
    #[clap(long, env = "ADCATALOG_REFRESH_INTERVAL", default_value_t = 300)]
    #[garde(range(min = 1))]
    refresh_interval: u64,

    /// Do not insert the sample placements and creatives on startup. When seeding, already existing ones are
    /// skipped.
    #[clap(long, env = "ADCATALOG_NO_SEED", default_value_t = false)]
    #[garde(skip)]
    no_seed: bool,

    /// File to send log into. Logs go to stdout by default.
    #[clap(long, env = "ADCATALOG_LOG_FILE")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn feature_enabled<'a>(enabled: bool, feature: &'static str) -> impl FnOnce(&'a bool, &()) -> garde::Result {
        move |value, _| {
            if !*value || enabled {
                Ok(())
            }
            else {
                Err(garde::Error::new(format!(
                    "Build feature '{feature}' must be enabled to use --{feature}."
                )))
            }
        }
    }

    pub(crate) fn seed(&self) -> bool {
        !self.no_seed()
    }
}
