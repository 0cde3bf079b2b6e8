use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{ArgAction, Parser};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::data::SessionHours;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("pivot strength must be at least 1 (got {0})")]
    InvalidStrength(usize),

    #[error("tick size must be positive (got {0})")]
    InvalidTickSize(Decimal),

    #[error("session hours must satisfy start < end <= 24 (got {start}..{end})")]
    InvalidSession { start: u32, end: u32 },

    #[error("analysis window must span at least one day")]
    InvalidWindow,

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Command-line configuration for the swing structure analyzer.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Input CSV file path containing OHLC(V) bars.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input_path: String,

    /// Bars required on each side of a pivot.
    #[arg(long, default_value_t = 12)]
    pub strength: usize,

    /// Minimum price increment of the instrument.
    #[arg(long, default_value_t = Decimal::new(25, 2))]
    pub tick_size: Decimal,

    /// Timezone the CSV timestamps are recorded in.
    #[arg(long, default_value = "America/New_York")]
    pub source_tz: String,

    /// Timezone used for the calendar window and session hours.
    #[arg(long, default_value = "America/New_York")]
    pub reference_tz: String,

    /// First session hour (inclusive) in the reference timezone.
    #[arg(long, default_value_t = 9)]
    pub session_start_hour: u32,

    /// Last session hour (exclusive) in the reference timezone.
    #[arg(long, default_value_t = 16)]
    pub session_end_hour: u32,

    /// Calendar days covered by the analysis window, ending on a Friday.
    #[arg(long, default_value_t = 14)]
    pub window_days: u32,

    /// Anchor date (YYYY-MM-DD); defaults to the date of the last bar.
    #[arg(long, value_name = "DATE")]
    pub anchor_date: Option<NaiveDate>,

    /// Emit the report as JSON instead of tables.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}

/// Validated, immutable parameters for a single analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub strength: usize,
    pub tick_size: Decimal,
    pub source_tz: Tz,
    pub reference_tz: Tz,
    pub session: SessionHours,
    pub window_days: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            strength: 12,
            tick_size: Decimal::new(25, 2),
            source_tz: chrono_tz::America::New_York,
            reference_tz: chrono_tz::America::New_York,
            session: SessionHours::default(),
            window_days: 14,
        }
    }
}

impl AppConfig {
    pub fn analysis_settings(&self) -> Result<AnalysisSettings, ConfigError> {
        if self.strength < 1 {
            return Err(ConfigError::InvalidStrength(self.strength));
        }
        if self.tick_size <= Decimal::ZERO {
            return Err(ConfigError::InvalidTickSize(self.tick_size));
        }
        if self.session_start_hour >= self.session_end_hour || self.session_end_hour > 24 {
            return Err(ConfigError::InvalidSession {
                start: self.session_start_hour,
                end: self.session_end_hour,
            });
        }
        if self.window_days == 0 {
            return Err(ConfigError::InvalidWindow);
        }

        Ok(AnalysisSettings {
            strength: self.strength,
            tick_size: self.tick_size,
            source_tz: resolve_timezone(&self.source_tz)?,
            reference_tz: resolve_timezone(&self.reference_tz)?,
            session: SessionHours {
                start_hour: self.session_start_hour,
                end_hour: self.session_end_hour,
            },
            window_days: self.window_days,
        })
    }
}

pub fn resolve_timezone(name: &str) -> Result<Tz, ConfigError> {
    Tz::from_str(name.trim()).map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let mut argv = vec!["swing-structure", "--input", "bars.csv"];
        argv.extend_from_slice(args);
        AppConfig::parse_from(argv)
    }

    #[test]
    fn defaults_resolve() {
        let settings = parse(&[]).analysis_settings().unwrap();
        assert_eq!(settings, AnalysisSettings::default());
    }

    #[test]
    fn zero_strength_is_rejected() {
        let err = parse(&["--strength", "0"]).analysis_settings().unwrap_err();
        assert_eq!(err, ConfigError::InvalidStrength(0));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = parse(&["--reference-tz", "Mars/Olympus_Mons"])
            .analysis_settings()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownTimezone("Mars/Olympus_Mons".to_string())
        );
    }

    #[test]
    fn inverted_session_is_rejected() {
        let err = parse(&["--session-start-hour", "16", "--session-end-hour", "9"])
            .analysis_settings()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSession { start: 16, end: 9 });
    }

    #[test]
    fn non_positive_tick_size_is_rejected() {
        let err = parse(&["--tick-size", "0"]).analysis_settings().unwrap_err();
        assert_eq!(err, ConfigError::InvalidTickSize(Decimal::ZERO));
    }
}
