//! Scheduling cadence (spec.md §4.9): a cron-like 5-field expression or a
//! plain interval in minutes. `is_due` folds in the "skip a run if the
//! tenant refreshed within one schedule interval" rule.

use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

use crate::error::SchedulerError;

#[derive(Debug, Clone)]
pub enum Cadence {
    IntervalMinutes(u64),
    Cron(Schedule),
}

impl Cadence {
    pub fn parse(expression: &str) -> Result<Self, SchedulerError> {
        let trimmed = expression.trim();
        if let Ok(minutes) = trimmed.parse::<u64>() {
            return Ok(Cadence::IntervalMinutes(minutes));
        }
        // The `cron` crate's schedules are 6/7-field (seconds-first); the
        // spec's cadence expressions are the standard 5-field form, so a
        // "0 " seconds prefix bridges the two.
        let six_field = format!("0 {trimmed}");
        Schedule::from_str(&six_field)
            .map(Cadence::Cron)
            .map_err(|e| SchedulerError::Cadence {
                expression: expression.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether a run is due given the last successful sync time. `None`
    /// (never synced) is always due.
    pub fn is_due(&self, last_sync_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(last) = last_sync_at else {
            return true;
        };
        match self {
            Cadence::IntervalMinutes(minutes) => {
                now - last >= chrono::Duration::minutes(*minutes as i64)
            }
            Cadence::Cron(schedule) => schedule
                .after(&last)
                .next()
                .map(|next_fire| next_fire <= now)
                .unwrap_or(false),
        }
    }
}

pub fn default_refresh_check_interval() -> Duration {
    Duration::from_secs(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer_parses_as_interval_minutes() {
        let cadence = Cadence::parse("30").unwrap();
        assert!(matches!(cadence, Cadence::IntervalMinutes(30)));
    }

    #[test]
    fn cron_expression_parses() {
        let cadence = Cadence::parse("0 */6 * * *").unwrap();
        assert!(matches!(cadence, Cadence::Cron(_)));
    }

    #[test]
    fn never_synced_is_always_due() {
        let cadence = Cadence::IntervalMinutes(60);
        assert!(cadence.is_due(None, Utc::now()));
    }

    #[test]
    fn interval_skips_within_window_and_fires_after() {
        let cadence = Cadence::IntervalMinutes(60);
        let now = Utc::now();
        assert!(!cadence.is_due(Some(now - chrono::Duration::minutes(10)), now));
        assert!(cadence.is_due(Some(now - chrono::Duration::minutes(61)), now));
    }
}
