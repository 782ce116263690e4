//! Frame timing statistics, reported once at shutdown.

use std::time::{Duration, Instant};

pub struct RuntimeStatistics {
    runtime_start: Instant,
    previous_frame_start: Option<Instant>,
    shortest_frame: Duration,
    longest_frame: Duration,
    frame_count: u64,
}

impl RuntimeStatistics {
    pub fn new() -> Self {
        Self {
            runtime_start: Instant::now(),
            previous_frame_start: None,
            shortest_frame: Duration::MAX,
            longest_frame: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub fn notify_frame_begin(&mut self) {
        self.frame_count += 1;

        let now = Instant::now();
        if let Some(previous) = self.previous_frame_start.replace(now) {
            let frame_time = now - previous;
            self.shortest_frame = self.shortest_frame.min(frame_time);
            self.longest_frame = self.longest_frame.max(frame_time);
        }
    }

    pub fn log_results(&self) {
        let runtime = self.runtime_start.elapsed();
        log::info!("overall runtime: {}ms", runtime.as_millis());
        log::info!("drawn frames: {}", self.frame_count);

        if self.frame_count == 0 || runtime.is_zero() {
            return;
        }

        let average = runtime / self.frame_count as u32;
        let fps = self.frame_count as f64 / runtime.as_secs_f64();
        log::info!(
            "average frame time: {:.2}ms / {:.0} fps",
            average.as_secs_f64() * 1000.0,
            fps
        );
        if self.frame_count > 1 {
            log::info!("best frame time: {}ms", self.shortest_frame.as_millis());
            log::info!("worst frame time: {}ms", self.longest_frame.as_millis());
        }
    }
}

impl Default for RuntimeStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_orders_extremes() {
        let mut stats = RuntimeStatistics::new();
        for _ in 0..3 {
            stats.notify_frame_begin();
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(stats.frame_count, 3);
        assert!(stats.shortest_frame <= stats.longest_frame);
    }

    #[test]
    fn first_frame_sets_no_extremes() {
        let mut stats = RuntimeStatistics::new();
        stats.notify_frame_begin();

        assert_eq!(stats.frame_count, 1);
        assert_eq!(stats.shortest_frame, Duration::MAX);
        assert_eq!(stats.longest_frame, Duration::ZERO);
    }
}
