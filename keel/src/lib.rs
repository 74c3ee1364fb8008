//! KEEL - Kinematic Estimation & Leveling Engine
//!
//! Stabilizes a rendered video surface's rotation against a handheld
//! device's physical tilt. Gravity samples are smoothed, converted to a
//! tilt angle, and routed through the lock states:
//! Free -> Locked -> Unlocking -> Free. Each tick yields an affine
//! transform (uniform cover-fit scale + rotation) for the video surface.

use std::sync::{Arc, Mutex};

pub mod animator;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod mock_sensor;
pub mod sensor;
pub mod smoothing;
pub mod snap;
pub mod state;
pub mod transform;

use keel_math::compass_degrees;

use crate::diagnostics::{DiagnosticsSnapshot, RotationCounter};
use crate::smoothing::{GravityFilter, SmoothedGravity};
use crate::state::UnlockContext;

// Re-export commonly used types for external use
pub use crate::config::StabilizerConfig;
pub use crate::engine::StabilizationEngine;
pub use crate::error::StabilizerError;
pub use crate::sensor::{GravitySample, GravitySource};
pub use crate::state::LockState;
pub use crate::transform::{AffineTransform, SurfaceGeometry, TransformBuilder};

/// Events driving the stabilizer pipeline.
///
/// Time-carrying events receive `now` in seconds on the caller's monotonic
/// timeline; the pipeline never reads a clock itself, which keeps every
/// transition deterministic under test.
#[derive(Debug, Clone)]
pub enum StabilizerEvent {
    /// A live gravity sample arrived on the sensor tick.
    Sample(GravitySample),
    /// The unlock animation clock fired.
    AnimationTick {
        /// Seconds on the engine timeline.
        now: f64,
    },
    /// Snap the displayed angle within the lock band.
    Lock,
    /// Release the displayed angle toward the live tilt angle.
    Unlock {
        /// Seconds on the engine timeline; becomes the animation origin.
        now: f64,
    },
}

/// The stabilizer pipeline and lock state machine.
///
/// Purely event-driven and single-threaded by construction: the owning
/// engine delivers sensor ticks, animation ticks, and control requests on
/// one cooperative queue, so no internal locking guards the pipeline
/// state. Only the diagnostics counter is shared, as the snapshot boundary
/// for other threads.
pub struct Stabilizer {
    /// System configuration.
    config: StabilizerConfig,
    /// Current lock state.
    lock_state: LockState,
    /// Gravity smoothing filter.
    filter: GravityFilter,
    /// Transform construction for the fixed surface geometry.
    builder: TransformBuilder,
    /// Most recent raw tilt angle, once any non-flat sample has arrived.
    last_raw_angle: Option<f64>,
    /// Most recent displayed angle, once any transform has been emitted.
    last_display_angle: Option<f64>,
    /// Rotation diagnostics, shared with snapshot readers.
    counter: Arc<Mutex<RotationCounter>>,
}

impl Stabilizer {
    /// Create a stabilizer for a surface geometry.
    ///
    /// Fails fast on invalid configuration or degenerate dimensions.
    pub fn new(
        config: StabilizerConfig,
        geometry: SurfaceGeometry,
    ) -> Result<Self, StabilizerError> {
        config.validate()?;
        let builder = TransformBuilder::new(geometry)?;
        Ok(Self {
            filter: GravityFilter::new(config.min_decay),
            config,
            lock_state: LockState::Free,
            builder,
            last_raw_angle: None,
            last_display_angle: None,
            counter: Arc::new(Mutex::new(RotationCounter::new())),
        })
    }

    /// Process an event and potentially emit a transform.
    ///
    /// Exactly the ticks that produce a displayed angle return
    /// `Some(transform)`: sensor ticks in Free/Locked and animation ticks
    /// while Unlocking. Control events and skipped ticks return `None`.
    pub fn process_event(&mut self, event: StabilizerEvent) -> Option<AffineTransform> {
        match event {
            StabilizerEvent::Sample(sample) => self.handle_sample(sample),
            StabilizerEvent::AnimationTick { now } => self.handle_animation_tick(now),
            StabilizerEvent::Lock => self.handle_lock(),
            StabilizerEvent::Unlock { now } => self.handle_unlock(now),
        }
    }

    /// Handle a live gravity sample.
    fn handle_sample(&mut self, sample: GravitySample) -> Option<AffineTransform> {
        // Flat reading: gravity direction is ill-defined, discard the tick
        // outright. The previous transform stays last-known-good.
        if sample.is_flat(self.config.flat_threshold) {
            return None;
        }

        let smoothed = self.filter.update(sample);
        let raw_angle = snap::raw_tilt_angle(smoothed);
        self.last_raw_angle = Some(raw_angle);

        let displayed = match self.lock_state {
            // The animation clock owns the display during release; the
            // sensor path only keeps the raw angle current for the moment
            // the window ends.
            LockState::Unlocking { .. } => return None,
            LockState::Free => raw_angle,
            LockState::Locked => snap::snap_to_lock_band(
                raw_angle,
                self.config.min_lock_angle,
                self.config.max_lock_angle,
            ),
        };
        Some(self.emit(displayed))
    }

    /// Handle an unlock animation tick.
    fn handle_animation_tick(&mut self, now: f64) -> Option<AffineTransform> {
        let context = match self.lock_state {
            LockState::Unlocking { context } => context,
            // Stale tick after the window closed or a lock interrupted it.
            _ => return None,
        };

        let elapsed = now - context.start_time;
        if elapsed > self.config.unlock_duration {
            // Terminate even when the overrun is observed late; the live
            // raw angle takes over immediately.
            log::info!("Unlock animation complete, returning to Free");
            self.lock_state = LockState::Free;
            let live = self
                .last_raw_angle
                .unwrap_or(context.initial_angle + context.delta_angle);
            Some(self.emit(live))
        } else {
            Some(self.emit(animator::sample(&context, elapsed)))
        }
    }

    /// Handle a lock request.
    fn handle_lock(&mut self) -> Option<AffineTransform> {
        match self.lock_state {
            LockState::Locked => {} // idempotent
            LockState::Unlocking { .. } => {
                log::info!("Lock requested mid-release, abandoning unlock animation");
                self.lock_state = LockState::Locked;
            }
            LockState::Free => {
                log::info!("Locking display angle to the lock band");
                self.lock_state = LockState::Locked;
            }
        }
        None
    }

    /// Handle an unlock request.
    fn handle_unlock(&mut self, now: f64) -> Option<AffineTransform> {
        let initial_angle = self
            .last_display_angle
            .or(self.last_raw_angle)
            .unwrap_or(0.0);
        let delta_angle = self.last_raw_angle.unwrap_or(initial_angle) - initial_angle;
        let context = UnlockContext {
            start_time: now,
            initial_angle,
            delta_angle,
        };
        log::info!(
            "Unlocking: releasing {:.3} rad toward {:.3} rad",
            initial_angle,
            initial_angle + delta_angle
        );
        self.lock_state = LockState::Unlocking { context };
        None
    }

    /// Emit a transform for a displayed angle, recording diagnostics.
    fn emit(&mut self, displayed_angle: f64) -> AffineTransform {
        self.last_display_angle = Some(displayed_angle);
        let transform = self.builder.build(displayed_angle);
        self.counter
            .lock()
            .unwrap()
            .record(compass_degrees(displayed_angle));
        transform
    }

    /// Current lock state.
    pub fn lock_state(&self) -> &LockState {
        &self.lock_state
    }

    /// Most recent raw tilt angle, radians.
    pub fn last_raw_angle(&self) -> Option<f64> {
        self.last_raw_angle
    }

    /// Most recent displayed angle, radians.
    pub fn last_display_angle(&self) -> Option<f64> {
        self.last_display_angle
    }

    /// Current smoothed gravity state.
    pub fn smoothed_gravity(&self) -> SmoothedGravity {
        self.filter.smoothed()
    }

    /// Baseline transform with no rotation.
    pub fn zero_rotation_transform(&self) -> AffineTransform {
        self.builder.zero_rotation()
    }

    /// Handle to the shared diagnostics counter.
    pub fn diagnostics_counter(&self) -> Arc<Mutex<RotationCounter>> {
        self.counter.clone()
    }

    /// Snapshot and reset the diagnostics counter.
    pub fn take_diagnostics(&self) -> DiagnosticsSnapshot {
        self.counter.lock().unwrap().take()
    }

    /// The configuration in effect.
    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }
}
