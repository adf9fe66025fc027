//! Throttled terminal progress line.

use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 40;

/// Minimum time between two rendered lines.
pub const DRAW_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct Progress {
    total: usize,
    completed: usize,
    started: Instant,
    last_draw: Instant,
    interval: Duration,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self::starting_at(total, Instant::now())
    }

    pub fn starting_at(total: usize, started: Instant) -> Self {
        Self {
            total,
            completed: 0,
            started,
            last_draw: started,
            interval: DRAW_INTERVAL,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Record one finished item. Returns a line to draw when the interval has
    /// elapsed since the last draw (or since the start) or when this was the
    /// final item.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        self.completed = (self.completed + 1).min(self.total);

        let finished = self.completed == self.total;
        let due = now.saturating_duration_since(self.last_draw) >= self.interval;
        if !finished && !due {
            return None;
        }

        self.last_draw = now;
        Some(render_line(
            self.completed,
            self.total,
            now.saturating_duration_since(self.started),
        ))
    }
}

/// `[████░░░░] 12/48 (25.0%) - ETA: 01:30`
pub fn render_line(completed: usize, total: usize, elapsed: Duration) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        completed as f64 / total as f64
    };
    let filled = ((fraction * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));

    let eta = if completed == 0 {
        "calculating...".to_owned()
    } else {
        let per_item = elapsed.as_secs_f64() / completed as f64;
        let secs = (per_item * total.saturating_sub(completed) as f64) as u64;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    };

    format!(
        "[{bar}] {completed}/{total} ({:.1}%) - ETA: {eta}",
        fraction * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_half_way() {
        let line = render_line(5, 10, Duration::from_secs(50));
        assert_eq!(
            line,
            format!(
                "[{}{}] 5/10 (50.0%) - ETA: 00:50",
                "█".repeat(20),
                "░".repeat(20)
            )
        );
    }

    #[test]
    fn empty_total_is_complete() {
        let line = render_line(0, 0, Duration::ZERO);
        assert!(line.starts_with(&format!("[{}]", "█".repeat(BAR_WIDTH))));
        assert!(line.ends_with("0/0 (100.0%) - ETA: calculating..."));
    }

    #[test]
    fn eta_waits_for_first_item() {
        let line = render_line(0, 10, Duration::from_secs(5));
        assert!(line.ends_with("0/10 (0.0%) - ETA: calculating..."), "{line}");
    }

    #[test]
    fn eta_rolls_into_minutes() {
        let line = render_line(1, 4, Duration::from_secs(40));
        assert!(line.ends_with("ETA: 02:00"), "{line}");
    }

    #[test]
    fn throttles_between_draws() {
        let start = Instant::now();
        let mut progress = Progress::starting_at(4, start);

        assert!(progress.tick(start).is_none(), "nothing drawn before the interval");
        assert!(progress.tick(start + Duration::from_millis(500)).is_none());
        assert!(progress.tick(start + Duration::from_secs(3)).is_some());
        let last = progress.tick(start + Duration::from_millis(3100));
        assert!(last.is_some(), "final item always draws");
        assert_eq!(progress.completed(), 4);
    }
}
