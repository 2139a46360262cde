//! Per-notification animation state and the timed tweens that drive it.
//!
//! Every notification id owns one [`AnimationState`] inside an
//! [`AnimationRegistry`]. States are created lazily and are never destroyed, only
//! reset to their rest pose, so an id that comes back (or a recycled row) starts
//! from a clean slate.
//!
//! Tweens advance once per frame ([`FRAME_INTERVAL`]) on the tokio timer. Each
//! running animation captures the state's `generation` when it starts and stops
//! writing as soon as the generation moves on, which is how a reset or a newer
//! animation on the same id supersedes an older one without explicit cancellation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Length of one animation frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Duration of the fade + slide exit animation.
pub const EXIT_DURATION: Duration = Duration::from_millis(180);

/// Horizontal distance travelled by an exiting row.
pub const EXIT_OFFSET: f64 = 40.0;

/// Duration of the fade-in for push-delivered rows.
pub const ARRIVAL_FADE_DURATION: Duration = Duration::from_millis(300);

/// Duration of one half (0→1 or 1→0) of the glow pulse.
pub const GLOW_HALF_CYCLE: Duration = Duration::from_millis(500);

/// Number of full 0→1→0 glow cycles.
pub const GLOW_ITERATIONS: u32 = 3;

/// Start delay between consecutive rows of a clear-all.
pub const CLEAR_STAGGER: Duration = Duration::from_millis(80);

/// Waits for the next frame boundary.
///
/// Used wherever a freshly inserted row must be observed by the renderer before
/// anything animates it.
pub async fn next_frame() {
    tokio::time::sleep(FRAME_INTERVAL).await;
}

/// Transient visual state of one notification row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Horizontal displacement of the exit slide.
    pub offset: f64,
    /// Glow intensity in `[0, 1]`, used only for push arrivals.
    pub glow_pulse: f64,
    /// Whether the row casts its shadow. Dropped in one step when an exit starts.
    pub elevated: bool,
    /// When the most recent exit animation started.
    pub exit_started_at: Option<Instant>,
    /// Bumped on every reset and every new animation start.
    pub generation: u64,
}

impl AnimationState {
    /// Fully visible, in place, not glowing.
    pub const REST: Self = Self {
        opacity: 1.0,
        offset: 0.0,
        glow_pulse: 0.0,
        elevated: true,
        exit_started_at: None,
        generation: 0,
    };

    fn rest_after(generation: u64) -> Self {
        Self {
            generation: generation.wrapping_add(1),
            ..Self::REST
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::REST
    }
}

/// Timing curve applied to tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Fast start, slow finish (cubic ease-out).
    Decelerate,
    /// Slow start and finish (sine).
    EaseInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => 0.5 - (std::f64::consts::PI * t).cos() / 2.0,
        }
    }
}

/// Interpolation of a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub easing: Easing,
}

impl Tween {
    #[must_use]
    pub const fn new(from: f64, to: f64, easing: Easing) -> Self {
        Self { from, to, easing }
    }

    /// Value at linear progress `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> f64 {
        (self.to - self.from).mul_add(self.easing.apply(t), self.from)
    }
}

/// Owner of every row's [`AnimationState`], keyed by notification id.
///
/// Scoped to one feed; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct AnimationRegistry {
    states: Mutex<HashMap<String, AnimationState>>,
}

impl AnimationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AnimationState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the state for `id`, creating it in its rest pose if needed.
    pub fn get_or_create(&self, id: &str) -> AnimationState {
        *self.lock().entry(id.to_string()).or_default()
    }

    /// Current state for `id` without creating one.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<AnimationState> {
        self.lock().get(id).copied()
    }

    /// Puts `id` back into its rest pose, superseding any running animation.
    pub fn reset(&self, id: &str) -> AnimationState {
        let mut states = self.lock();
        let state = states.entry(id.to_string()).or_default();
        *state = AnimationState::rest_after(state.generation);
        *state
    }

    /// Resets every tracked state. Entries are kept for reuse.
    pub fn reset_all(&self) {
        let mut states = self.lock();
        for state in states.values_mut() {
            *state = AnimationState::rest_after(state.generation);
        }
        tracing::debug!(count = states.len(), "animation states reset");
    }

    /// Number of tracked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Creates or resets `id` in the pre-arrival pose: invisible, not glowing.
    /// Returns the generation the arrival animation must run under.
    pub fn prepare_arrival(&self, id: &str) -> u64 {
        let mut states = self.lock();
        let state = states.entry(id.to_string()).or_default();
        *state = AnimationState {
            opacity: 0.0,
            ..AnimationState::rest_after(state.generation)
        };
        state.generation
    }

    /// Starts an exit on `id`: drops the shadow immediately, stamps the start time
    /// and takes a new generation, superseding any running animation.
    pub fn begin_exit(&self, id: &str) -> u64 {
        let mut states = self.lock();
        let state = states.entry(id.to_string()).or_default();
        state.elevated = false;
        state.exit_started_at = Some(Instant::now());
        state.generation = state.generation.wrapping_add(1);
        state.generation
    }

    /// Applies `f` to `id` only if it is still on `generation`.
    /// Returns `false` when the animation has been superseded.
    pub fn update(&self, id: &str, generation: u64, f: impl FnOnce(&mut AnimationState)) -> bool {
        match self.lock().get_mut(id) {
            Some(state) if state.generation == generation => {
                f(state);
                true
            }
            _ => false,
        }
    }
}

/// Advances a tween frame by frame until `duration` has elapsed.
///
/// `apply` receives linear progress in `[0, 1]`; the final frame always lands on
/// exactly `1.0`. Returns `false` if the animation was superseded midway.
async fn drive(
    registry: &AnimationRegistry,
    id: &str,
    generation: u64,
    duration: Duration,
    mut apply: impl FnMut(&mut AnimationState, f64),
) -> bool {
    let start = Instant::now();
    loop {
        let elapsed = start.elapsed().min(duration);
        let t = if duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / duration.as_secs_f64()
        };

        if !registry.update(id, generation, |state| apply(state, t)) {
            return false;
        }
        if elapsed >= duration {
            return true;
        }
        tokio::time::sleep(FRAME_INTERVAL.min(duration - elapsed)).await;
    }
}

/// Runs the exit animation for `id`: opacity 1→0 and offset 0→[`EXIT_OFFSET`]
/// together over [`EXIT_DURATION`] on a decelerating curve.
///
/// Returns `false` if a reset or another animation took over the row first.
pub async fn run_exit(registry: &AnimationRegistry, id: &str) -> bool {
    let generation = registry.begin_exit(id);
    let opacity = Tween::new(1.0, 0.0, Easing::Decelerate);
    let offset = Tween::new(0.0, EXIT_OFFSET, Easing::Decelerate);

    let completed = drive(registry, id, generation, EXIT_DURATION, |state, t| {
        state.opacity = opacity.at(t);
        state.offset = offset.at(t);
    })
    .await;

    tracing::trace!(notification_id = %id, completed, "exit animation finished");
    completed
}

/// Runs the arrival animation for `id` under `generation` (from
/// [`AnimationRegistry::prepare_arrival`]): a [`ARRIVAL_FADE_DURATION`] fade-in in
/// parallel with [`GLOW_ITERATIONS`] glow pulses of two [`GLOW_HALF_CYCLE`]s each.
pub async fn run_arrival(registry: &AnimationRegistry, id: &str, generation: u64) -> bool {
    let fade_in = Tween::new(0.0, 1.0, Easing::Linear);
    let fade = drive(registry, id, generation, ARRIVAL_FADE_DURATION, |state, t| {
        state.opacity = fade_in.at(t);
    });

    let glow = async {
        let up = Tween::new(0.0, 1.0, Easing::EaseInOut);
        let down = Tween::new(1.0, 0.0, Easing::EaseInOut);
        for _ in 0..GLOW_ITERATIONS {
            for half in [up, down] {
                let finished = drive(registry, id, generation, GLOW_HALF_CYCLE, |state, t| {
                    state.glow_pulse = half.at(t);
                })
                .await;
                if !finished {
                    return false;
                }
            }
        }
        true
    };

    let (faded, glowed) = futures_util::future::join(fade, glow).await;
    faded && glowed
}
