//! Paced release of streamed text so the display "types" at roughly the
//! rate chunks arrive instead of jumping ahead in bursts.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::constants::{
    TYPEWRITER_DEFAULT_DELAY_MS, TYPEWRITER_MAX_DELAY_MS, TYPEWRITER_MIN_DELAY_MS,
    TYPEWRITER_MOVING_AVG_SIZE,
};

pub struct TypewriterBuffer {
    pending: VecDeque<char>,
    intervals: VecDeque<Duration>,
    sizes: VecDeque<usize>,
    last_chunk_at: Option<Instant>,
    last_release_at: Instant,
    chars_per_ms: f64,
    stream_done: bool,
}

impl TypewriterBuffer {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            intervals: VecDeque::new(),
            sizes: VecDeque::new(),
            last_chunk_at: None,
            last_release_at: Instant::now(),
            chars_per_ms: 1.0 / TYPEWRITER_DEFAULT_DELAY_MS,
            stream_done: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a chunk and fold its arrival timing into the pacing estimate.
    pub fn add_chunk(&mut self, text: &str) {
        let now = Instant::now();
        if let Some(prev) = self.last_chunk_at {
            if self.intervals.len() >= TYPEWRITER_MOVING_AVG_SIZE {
                self.intervals.pop_front();
            }
            self.intervals.push_back(now.duration_since(prev));
        }
        self.last_chunk_at = Some(now);

        if self.sizes.len() >= TYPEWRITER_MOVING_AVG_SIZE {
            self.sizes.pop_front();
        }
        self.sizes.push_back(text.chars().count());

        self.pending.extend(text.chars());
        self.update_pace();
    }

    fn update_pace(&mut self) {
        if self.intervals.is_empty() || self.sizes.is_empty() {
            return;
        }
        let avg_interval_ms: f64 = self.intervals.iter().map(|d| d.as_secs_f64() * 1000.0).sum::<f64>()
            / self.intervals.len() as f64;
        let avg_size = self.sizes.iter().sum::<usize>() as f64 / self.sizes.len() as f64;
        if avg_interval_ms > 0.0 && avg_size > 0.0 {
            let delay = (avg_interval_ms / avg_size).clamp(TYPEWRITER_MIN_DELAY_MS, TYPEWRITER_MAX_DELAY_MS);
            self.chars_per_ms = 1.0 / delay;
        }
    }

    /// The stream finished; remaining chars may be released faster.
    pub fn mark_done(&mut self) {
        self.stream_done = true;
    }

    /// Release the chars that have "earned" display time since the last call.
    pub fn take_chars(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }

        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last_release_at).as_secs_f64() * 1000.0;
        let earned = (elapsed_ms * self.chars_per_ms).floor() as usize;
        if earned == 0 {
            return None;
        }

        // After Done, never release fewer than 2 chars per tick so the tail
        // of the answer does not crawl.
        let count = if self.stream_done { earned.max(2) } else { earned }.min(self.pending.len());
        self.last_release_at = now;

        Some(self.pending.drain(..count).collect())
    }

    /// Hand over everything still queued, pacing ignored. Used when a stream
    /// errors so the partial answer is preserved in full.
    pub fn drain_all(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.drain(..).collect())
    }
}
