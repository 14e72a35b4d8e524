//! Progress estimation from the encoder's diagnostic stream.
//!
//! The encoder periodically writes lines containing `time=HH:MM:SS.ff`
//! to its diagnostic output. This parser extracts that timestamp and
//! converts it into a percentage of the known total duration. Any line
//! without a parseable timestamp is "no progress update", never an error.

/// Stateful line-oriented progress estimator.
///
/// Reported values are monotonically non-decreasing and capped at 99;
/// the pipeline writes the final 100 itself once upload and persistence
/// have completed.
#[derive(Debug)]
pub struct ProgressEstimator {
    total_ms: i64,
    last_reported: u8,
}

impl ProgressEstimator {
    /// Create an estimator for a source of the given duration in seconds.
    pub fn new(total_duration_secs: f64) -> Self {
        Self {
            total_ms: (total_duration_secs * 1000.0) as i64,
            last_reported: 0,
        }
    }

    /// Feed one diagnostic line; returns a new percentage when the line
    /// advances progress.
    pub fn observe_line(&mut self, line: &str) -> Option<u8> {
        if self.total_ms <= 0 {
            return None;
        }

        let elapsed_ms = parse_time_ms(line)?;
        let pct = ((elapsed_ms as f64 / self.total_ms as f64) * 100.0).clamp(0.0, 99.0) as u8;

        if pct > self.last_reported {
            self.last_reported = pct;
            Some(pct)
        } else {
            None
        }
    }
}

/// Extract a `time=HH:MM:SS.ff` timestamp from a diagnostic line, in
/// milliseconds.
fn parse_time_ms(line: &str) -> Option<i64> {
    let start = line.find("time=")? + "time=".len();
    let rest = &line[start..];
    let token = rest.split_whitespace().next()?;

    let mut parts = token.splitn(3, ':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;

    if !(0..60).contains(&minutes) || !(0.0..60.0).contains(&seconds) || hours < 0 {
        return None;
    }

    Some(hours * 3_600_000 + minutes * 60_000 + (seconds * 1000.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encoder_status_line() {
        let line = "frame= 2431 fps=121 q=28.0 size=  12544KiB time=00:01:41.32 bitrate=1014.1kbits/s speed=5.05x";
        assert_eq!(parse_time_ms(line), Some(101_320));
    }

    #[test]
    fn garbage_lines_yield_no_update() {
        assert_eq!(parse_time_ms("Press [q] to stop, [?] for help"), None);
        assert_eq!(parse_time_ms("time=N/A bitrate=N/A"), None);
        assert_eq!(parse_time_ms(""), None);
    }

    #[test]
    fn progress_is_monotone_and_capped_at_99() {
        let mut est = ProgressEstimator::new(100.0);

        assert_eq!(est.observe_line("time=00:00:30.00"), Some(30));
        // A stale timestamp never moves progress backwards.
        assert_eq!(est.observe_line("time=00:00:10.00"), None);
        assert_eq!(est.observe_line("time=00:00:30.50"), None);
        assert_eq!(est.observe_line("time=00:01:00.00"), Some(60));
        // Past the end still reads 99, never 100.
        assert_eq!(est.observe_line("time=00:02:30.00"), Some(99));
        assert_eq!(est.observe_line("time=00:09:59.99"), None);
    }

    #[test]
    fn zero_duration_never_reports() {
        let mut est = ProgressEstimator::new(0.0);
        assert_eq!(est.observe_line("time=00:00:30.00"), None);
    }
}
