use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub cycles_per_second: f32,
    pub steps_per_second: f32,
    pub episodes_completed: u64,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    cycles: u32,
    steps: u32,
    episodes_completed: u64,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval_start: start,
            interval,
            cycles: 0,
            steps: 0,
            episodes_completed: 0,
        }
    }

    pub(crate) fn record_cycle(&mut self) {
        self.cycles = self.cycles.saturating_add(1);
    }

    pub(crate) fn record_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    // Total over the session, not reset per interval.
    pub(crate) fn record_episode(&mut self) {
        self.episodes_completed = self.episodes_completed.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let snapshot = LoopMetricsSnapshot {
            cycles_per_second: self.cycles as f32 / elapsed_seconds,
            steps_per_second: self.steps as f32 / elapsed_seconds,
            episodes_completed: self.episodes_completed,
        };

        self.interval_start = now;
        self.cycles = 0;
        self.steps = 0;

        Some(snapshot)
    }
}
