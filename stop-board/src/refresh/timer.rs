//! Refresh timer engine.
//!
//! Drives a repeating countdown toward a fixed cycle duration,
//! exposing progress for display and invoking a completion callback
//! at 100%. After the callback returns the timer starts a new cycle by
//! itself, producing a self-sustaining poll loop, unless it was
//! stopped in the meantime.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::warn;

/// Error type completion callbacks may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Async callback invoked each time a cycle completes.
pub type CompletionCallback = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Default cycle duration: 5 seconds.
const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Default sampling tick.
const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// Configuration for the refresh timer.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Length of one cycle. Must be non-zero.
    pub duration: Duration,
    /// How often elapsed time is sampled into `progress`.
    pub tick: Duration,
    /// Start counting immediately on construction.
    pub auto_start: bool,
}

impl TimerConfig {
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            tick: DEFAULT_TICK,
            auto_start: true,
        }
    }

    /// Set the cycle duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the sampling tick.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Do not start until `start()` is called.
    pub fn manual_start(mut self) -> Self {
        self.auto_start = false;
        self
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the timer's externally visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Percentage of the current cycle elapsed, 0..=100.
    pub progress: u8,
    /// Whether a cycle is currently counting.
    pub is_active: bool,
    /// When the current cycle started.
    pub started_at: Option<Instant>,
}

/// Progress percentage for a given elapsed time.
///
/// `round(100 * min(elapsed, duration) / duration)`, saturating at 100.
pub fn progress_at(elapsed: Duration, duration: Duration) -> u8 {
    if duration.is_zero() {
        return 100;
    }

    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    (ratio * 100.0).round().min(100.0) as u8
}

/// Mutable cycle state, shared between handles and the sampling loop.
///
/// `generation` identifies the current cycle's owner: every `start()`
/// and `stop()` bumps it, and a sampling loop only acts while its own
/// generation is still current. That makes a superseded loop exit
/// instead of running concurrently with its replacement, and makes the
/// post-callback restart decision explicit: restart only if nobody
/// started or stopped the timer while the callback ran.
struct CycleState {
    progress: u8,
    is_active: bool,
    started_at: Option<Instant>,
    generation: u64,
}

/// The refresh timer engine.
///
/// Cheap to clone; clones share the same underlying timer. Must be
/// created inside a tokio runtime, since each cycle runs as a spawned
/// sampling task.
///
/// A completion callback error is logged and the next cycle still
/// starts: a failed refresh is transient and the poll loop must not
/// silently die over it.
#[derive(Clone)]
pub struct RefreshTimer {
    state: Arc<Mutex<CycleState>>,
    duration: Duration,
    tick: Duration,
    on_complete: CompletionCallback,
}

impl RefreshTimer {
    /// Create a timer, starting it immediately unless the config says
    /// otherwise.
    pub fn new(config: TimerConfig, on_complete: CompletionCallback) -> Self {
        debug_assert!(!config.duration.is_zero(), "cycle duration must be non-zero");

        let timer = Self {
            state: Arc::new(Mutex::new(CycleState {
                progress: 0,
                is_active: false,
                started_at: None,
                generation: 0,
            })),
            duration: config.duration,
            tick: config.tick,
            on_complete,
        };

        if config.auto_start {
            timer.start();
        }

        timer
    }

    /// Begin a new cycle: progress returns to 0 and counting starts
    /// from now. If a cycle is already running it is superseded, never
    /// duplicated.
    pub fn start(&self) {
        let generation = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.is_active = true;
            state.progress = 0;
            state.started_at = Some(Instant::now());
            state.generation
        };

        let state = Arc::clone(&self.state);
        let duration = self.duration;
        let tick = self.tick;
        let on_complete = Arc::clone(&self.on_complete);

        tokio::spawn(run_cycles(state, duration, tick, on_complete, generation));
    }

    /// Halt the timer: no completion will fire until `start()`.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.is_active = false;
        state.progress = 0;
        state.started_at = None;
    }

    /// Restart if active, otherwise ensure stopped.
    pub fn reset(&self) {
        if self.is_active() {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> TimerState {
        let state = self.state.lock().unwrap();
        TimerState {
            progress: state.progress,
            is_active: state.is_active,
            started_at: state.started_at,
        }
    }

    /// Progress through the current cycle, 0..=100.
    pub fn progress(&self) -> u8 {
        self.state.lock().unwrap().progress
    }

    /// Whether a cycle is currently counting.
    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().is_active
    }

    /// Time elapsed in the current cycle.
    pub fn elapsed(&self) -> Duration {
        let state = self.state.lock().unwrap();
        state
            .started_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Time remaining in the current cycle.
    pub fn time_left(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed())
    }

    /// The configured cycle duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Sampling loop body. One task owns one generation at a time; the
/// task exits as soon as its generation is superseded.
async fn run_cycles(
    state: Arc<Mutex<CycleState>>,
    duration: Duration,
    tick: Duration,
    on_complete: CompletionCallback,
    mut generation: u64,
) {
    loop {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Sample until this cycle completes or is superseded.
        loop {
            interval.tick().await;

            let mut guard = state.lock().unwrap();
            if guard.generation != generation || !guard.is_active {
                return;
            }

            let elapsed = guard
                .started_at
                .map(|t| t.elapsed())
                .unwrap_or(Duration::ZERO);
            guard.progress = progress_at(elapsed, duration);

            if guard.progress >= 100 {
                // Completion deactivates; restart is decided below.
                guard.is_active = false;
                break;
            }
        }

        if let Err(error) = (on_complete)().await {
            warn!(%error, "refresh completion callback failed");
        }

        // Restart only if neither stop() nor a superseding start()
        // happened while the callback ran.
        {
            let mut guard = state.lock().unwrap();
            if guard.generation != generation {
                return;
            }
            guard.generation += 1;
            generation = guard.generation;
            guard.is_active = true;
            guard.progress = 0;
            guard.started_at = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::OnceLock;

    fn noop_callback() -> CompletionCallback {
        Arc::new(|| Box::pin(async { Ok(()) }))
    }

    fn counting_callback(count: Arc<AtomicUsize>) -> CompletionCallback {
        Arc::new(move || {
            let count = Arc::clone(&count);
            Box::pin(async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
    }

    fn config(duration_ms: u64) -> TimerConfig {
        TimerConfig::new().with_duration(Duration::from_millis(duration_ms))
    }

    #[test]
    fn progress_formula() {
        let second = Duration::from_millis(1000);
        assert_eq!(progress_at(Duration::ZERO, second), 0);
        assert_eq!(progress_at(Duration::from_millis(500), second), 50);
        assert_eq!(progress_at(Duration::from_millis(995), second), 100);
        assert_eq!(progress_at(second, second), 100);
        // Saturates past the duration
        assert_eq!(progress_at(Duration::from_millis(2500), second), 100);
        // Rounds to nearest
        assert_eq!(progress_at(Duration::from_millis(333), second), 33);
        assert_eq!(progress_at(Duration::from_millis(335), second), 34);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_start_stays_idle() {
        let timer = RefreshTimer::new(config(1000).manual_start(), noop_callback());

        assert!(!timer.is_active());
        assert_eq!(timer.progress(), 0);
        assert_eq!(timer.state().started_at, None);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(!timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn progress_advances_with_elapsed_time() {
        let timer = RefreshTimer::new(config(1000), noop_callback());
        assert!(timer.is_active());

        tokio::time::sleep(Duration::from_millis(520)).await;
        assert_eq!(timer.progress(), 50);
        assert_eq!(timer.time_left(), Duration::from_millis(480));
    }

    #[tokio::test(start_paused = true)]
    async fn progress_is_monotonic_within_a_cycle() {
        let timer = RefreshTimer::new(config(1000), noop_callback());

        let mut last = 0;
        for _ in 0..18 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let progress = timer.progress();
            assert!(progress >= last, "progress went backwards: {last} -> {progress}");
            last = progress;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_clears_state_and_suppresses_completion() {
        let count = Arc::new(AtomicUsize::new(0));
        let timer = RefreshTimer::new(config(1000), counting_callback(Arc::clone(&count)));

        tokio::time::sleep(Duration::from_millis(400)).await;
        timer.stop();

        let state = timer.state();
        assert!(!state.is_active);
        assert_eq!(state.progress, 0);
        assert_eq!(state.started_at, None);
        assert_eq!(timer.elapsed(), Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn completes_once_per_cycle_and_restarts() {
        let count = Arc::new(AtomicUsize::new(0));
        let timer = RefreshTimer::new(config(1000), counting_callback(Arc::clone(&count)));

        tokio::time::sleep(Duration::from_millis(1520)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // The new cycle auto-started and is halfway through.
        assert!(timer.is_active());
        assert_eq!(timer.progress(), 50);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_progress_to_zero() {
        let timer = RefreshTimer::new(config(1000), noop_callback());

        tokio::time::sleep(Duration::from_millis(1020)).await;
        // Just past completion: the fresh cycle reports low progress.
        assert!(timer.progress() < 10, "progress: {}", timer.progress());
    }

    #[tokio::test(start_paused = true)]
    async fn reentrant_start_supersedes_without_duplicating() {
        let count = Arc::new(AtomicUsize::new(0));
        let timer = RefreshTimer::new(config(1000), counting_callback(Arc::clone(&count)));

        tokio::time::sleep(Duration::from_millis(500)).await;
        timer.start();
        assert_eq!(timer.progress(), 0);

        // The original cycle would have completed at 1000ms; the
        // superseding one completes at 1500ms. Exactly one completion.
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_callback_prevents_restart() {
        // The callback stops its own timer; the engine must honor that
        // instead of restarting off a stale activity flag.
        let slot: Arc<OnceLock<RefreshTimer>> = Arc::new(OnceLock::new());
        let count = Arc::new(AtomicUsize::new(0));

        let callback: CompletionCallback = {
            let slot = Arc::clone(&slot);
            let count = Arc::clone(&count);
            Arc::new(move || {
                let slot = Arc::clone(&slot);
                let count = Arc::clone(&count);
                Box::pin(async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    slot.get().unwrap().stop();
                    Ok(())
                })
            })
        };

        let timer = RefreshTimer::new(config(1000), callback);
        slot.set(timer.clone()).ok().unwrap();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_active());
        assert_eq!(timer.progress(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_error_is_not_fatal_to_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let failed_once = Arc::new(AtomicBool::new(false));

        let callback: CompletionCallback = {
            let count = Arc::clone(&count);
            let failed_once = Arc::clone(&failed_once);
            Arc::new(move || {
                let count = Arc::clone(&count);
                let failed_once = Arc::clone(&failed_once);
                Box::pin(async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    if !failed_once.swap(true, Ordering::SeqCst) {
                        return Err("upstream unavailable".into());
                    }
                    Ok(())
                })
            })
        };

        let timer = RefreshTimer::new(config(1000), callback);

        // First cycle fails, second still runs.
        tokio::time::sleep(Duration::from_millis(2520)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_can_be_started_again() {
        let count = Arc::new(AtomicUsize::new(0));
        let timer = RefreshTimer::new(
            config(1000).manual_start(),
            counting_callback(Arc::clone(&count)),
        );

        timer.start();
        tokio::time::sleep(Duration::from_millis(300)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        timer.start();
        tokio::time::sleep(Duration::from_millis(1020)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restarts_an_active_timer() {
        let timer = RefreshTimer::new(config(1000), noop_callback());

        tokio::time::sleep(Duration::from_millis(700)).await;
        timer.reset();
        assert!(timer.is_active());
        assert_eq!(timer.progress(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_keeps_a_stopped_timer_stopped() {
        let timer = RefreshTimer::new(config(1000).manual_start(), noop_callback());

        timer.reset();
        assert!(!timer.is_active());
        assert_eq!(timer.progress(), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Progress is always within 0..=100
        #[test]
        fn bounded(elapsed_ms in 0u64..600_000, duration_ms in 1u64..600_000) {
            let p = progress_at(
                Duration::from_millis(elapsed_ms),
                Duration::from_millis(duration_ms),
            );
            prop_assert!(p <= 100);
        }

        /// Progress is monotonic in elapsed time
        #[test]
        fn monotonic(a_ms in 0u64..600_000, b_ms in 0u64..600_000, duration_ms in 1u64..600_000) {
            let duration = Duration::from_millis(duration_ms);
            let (lo, hi) = if a_ms <= b_ms { (a_ms, b_ms) } else { (b_ms, a_ms) };
            prop_assert!(
                progress_at(Duration::from_millis(lo), duration)
                    <= progress_at(Duration::from_millis(hi), duration)
            );
        }

        /// Elapsed at or past the duration always reads 100
        #[test]
        fn saturates(extra_ms in 0u64..600_000, duration_ms in 1u64..600_000) {
            let duration = Duration::from_millis(duration_ms);
            let elapsed = duration + Duration::from_millis(extra_ms);
            prop_assert_eq!(progress_at(elapsed, duration), 100);
        }
    }
}
