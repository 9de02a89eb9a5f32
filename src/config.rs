use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc, Weekday};

/// Which civil day "today" means when a request omits a date.
///
/// Completion day keys are calendar dates with no attached zone; this
/// setting decides how the server resolves the current moment into one.
/// `Utc` keeps keys consistent across devices in different zones, `Local`
/// follows the server clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayConvention {
    Utc,
    Local,
}

impl DayConvention {
    pub fn today(self) -> NaiveDate {
        match self {
            DayConvention::Utc => Utc::now().date_naive(),
            DayConvention::Local => Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    /// Path of the JSON snapshot the store is persisted to.
    pub snapshot_path: PathBuf,

    /// First day of the civil week for Week-period ranges.
    pub week_start: Weekday,
    pub day_convention: DayConvention,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            snapshot_path: env::var("SNAPSHOT_PATH")
                .unwrap_or_else(|_| "habits.json".into())
                .into(),

            week_start: match env::var("WEEK_START").as_deref() {
                Ok("sunday") => Weekday::Sun,
                Ok("monday") | Err(_) => Weekday::Mon,
                Ok(other) => panic!("WEEK_START must be 'monday' or 'sunday', got '{other}'"),
            },
            day_convention: match env::var("DAY_CONVENTION").as_deref() {
                Ok("local") => DayConvention::Local,
                Ok("utc") | Err(_) => DayConvention::Utc,
                Ok(other) => panic!("DAY_CONVENTION must be 'utc' or 'local', got '{other}'"),
            },
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
