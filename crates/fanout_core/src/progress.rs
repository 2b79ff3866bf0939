use std::fmt;
use std::time::{Duration, Instant};

/// Running statistics for one batch run.
///
/// Elapsed time is measured on the monotonic clock from the instant the
/// tracker was created. Latency samples come from successful requests only.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    started: Instant,
    total: usize,
    pacing_delay: Duration,
    processed: usize,
    failed: usize,
    latencies: Vec<Duration>,
}

/// Derived numbers after an item reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub percent_done: f64,
    pub elapsed: Duration,
    /// `None` until the first success.
    pub average_latency: Option<Duration>,
    /// `None` until the first success.
    pub eta: Option<Duration>,
}

/// Aggregate statistics reported when the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
    pub average_latency: Option<Duration>,
    pub min_latency: Option<Duration>,
    pub max_latency: Option<Duration>,
    /// The item cap stopped the run before the input was exhausted.
    pub capped: bool,
}

impl ProgressTracker {
    pub fn new(total: usize, pacing_delay: Duration) -> Self {
        Self::starting_at(Instant::now(), total, pacing_delay)
    }

    pub fn starting_at(started: Instant, total: usize, pacing_delay: Duration) -> Self {
        Self {
            started,
            total,
            pacing_delay,
            processed: 0,
            failed: 0,
            latencies: Vec::new(),
        }
    }

    pub fn record_success(&mut self, latency: Duration) -> ProgressSnapshot {
        self.latencies.push(latency);
        self.processed += 1;
        self.snapshot_at(Instant::now())
    }

    pub fn record_failure(&mut self) -> ProgressSnapshot {
        self.failed += 1;
        self.processed += 1;
        self.snapshot_at(Instant::now())
    }

    pub fn average_latency(&self) -> Option<Duration> {
        let count = u32::try_from(self.latencies.len()).ok().filter(|n| *n > 0)?;
        Some(self.latencies.iter().sum::<Duration>() / count)
    }

    /// Remaining items times (average latency + pacing delay). Each remaining
    /// item waits out one pacing delay before its request starts.
    pub fn eta(&self) -> Option<Duration> {
        let per_item = self.average_latency()? + self.pacing_delay;
        let remaining = self.total.saturating_sub(self.processed);
        Some(per_item.saturating_mul(u32::try_from(remaining).unwrap_or(u32::MAX)))
    }

    pub fn snapshot_at(&self, now: Instant) -> ProgressSnapshot {
        let percent_done = if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        };
        ProgressSnapshot {
            processed: self.processed,
            total: self.total,
            percent_done,
            elapsed: now.saturating_duration_since(self.started),
            average_latency: self.average_latency(),
            eta: self.eta(),
        }
    }

    pub fn summary(&self, capped: bool) -> RunSummary {
        self.summary_at(Instant::now(), capped)
    }

    pub fn summary_at(&self, now: Instant, capped: bool) -> RunSummary {
        RunSummary {
            total: self.total,
            processed: self.processed,
            succeeded: self.latencies.len(),
            failed: self.failed,
            elapsed: now.saturating_duration_since(self.started),
            average_latency: self.average_latency(),
            min_latency: self.latencies.iter().min().copied(),
            max_latency: self.latencies.iter().max().copied(),
            capped,
        }
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {:.1}% elapsed {}",
            self.processed,
            self.total,
            self.percent_done,
            format_duration(self.elapsed)
        )?;
        if let Some(avg) = self.average_latency {
            write!(f, " avg {}", format_duration(avg))?;
        }
        if let Some(eta) = self.eta {
            write!(f, " eta {}", format_duration(eta))?;
        }
        Ok(())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}/{} ({} ok, {} failed) in {}",
            self.processed,
            self.total,
            self.succeeded,
            self.failed,
            format_duration(self.elapsed)
        )?;
        if let (Some(avg), Some(min), Some(max)) =
            (self.average_latency, self.min_latency, self.max_latency)
        {
            write!(
                f,
                "; latency avg {} min {} max {}",
                format_duration(avg),
                format_duration(min),
                format_duration(max)
            )?;
        }
        if self.capped {
            write!(f, "; stopped at item cap")?;
        }
        Ok(())
    }
}

/// Compact human-readable duration: `850ms`, `12.3s`, `4m 05s`, `1h 02m 03s`.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        return format!("{millis}ms");
    }
    let secs = duration.as_secs();
    if secs < 60 {
        return format!("{:.1}s", duration.as_secs_f64());
    }
    let (hours, rem) = (secs / 3600, secs % 3600);
    let (minutes, seconds) = (rem / 60, rem % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_formatted_by_magnitude() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(12_340)), "12.3s");
        assert_eq!(format_duration(Duration::from_secs(245)), "4m 05s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
