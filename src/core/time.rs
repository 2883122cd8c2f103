//! Demo time handling.
//!
//! DSDA prints times as `m:ss` or `h:mm:ss`, optionally followed by markers
//! such as `TAS` or `CO` in the same cell.

use chrono::TimeDelta;
use tracing::debug;

/// First whitespace-separated token of a time cell
pub fn first_token(time_text: &str) -> &str {
    time_text.split_whitespace().next().unwrap_or("")
}

/// Sort key used when ranking record candidates.
///
/// All separators are dropped and the remaining digits are read as one
/// integer, so `1:05` ranks as 105 and `59` as 59. This is not duration
/// arithmetic; runs within one level and category share a digit layout,
/// which is what keeps the ordering meaningful. Times without digits sort last.
pub fn comparable_key(time: &str) -> u64 {
    let digits: String = time.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(u64::MAX)
}

/// Parse `h:m:s` or `m:s` into a duration
pub fn parse_duration(time: &str) -> Option<TimeDelta> {
    let parts: Vec<i64> = time
        .split(':')
        .map(|p| p.trim().parse::<i64>().ok())
        .collect::<Option<_>>()?;

    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        _ => return None,
    };
    let seconds = h
        .checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)?;
    TimeDelta::try_seconds(seconds)
}

/// Format as `HH:MM:SS`, hours unbounded. Zero durations have no display value.
pub fn format_hms(duration: TimeDelta) -> Option<String> {
    let total = duration.num_seconds();
    if total == 0 {
        return None;
    }
    Some(format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    ))
}

/// Total, average and longest of a set of demo times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSummary {
    pub count: usize,
    pub total: TimeDelta,
    pub longest: Option<TimeDelta>,
}

impl Default for TimeSummary {
    fn default() -> Self {
        Self {
            count: 0,
            total: TimeDelta::zero(),
            longest: None,
        }
    }
}

impl TimeSummary {
    /// Times that would overflow the running total are dropped
    pub fn add(&mut self, time: TimeDelta) {
        let Some(total) = self.total.checked_add(&time) else {
            debug!("Skipping time {time}, total would overflow");
            return;
        };
        self.count += 1;
        self.total = total;
        if self.longest.map_or(true, |longest| time > longest) {
            self.longest = Some(time);
        }
    }

    /// Average truncated to whole seconds
    pub fn average(&self) -> TimeDelta {
        if self.count == 0 {
            return TimeDelta::zero();
        }
        TimeDelta::seconds(self.total.num_seconds() / self.count as i64)
    }
}

impl FromIterator<TimeDelta> for TimeSummary {
    fn from_iter<I: IntoIterator<Item = TimeDelta>>(iter: I) -> Self {
        let mut summary = Self::default();
        for time in iter {
            summary.add(time);
        }
        summary
    }
}
