use serde::{Deserialize, Serialize};

/// Animation context captured at the instant of an unlock request.
///
/// Read-only after capture; it exists exactly as long as the state machine
/// is in `Unlocking` and is discarded on the transition back to `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnlockContext {
    /// Animation clock origin, seconds on the engine's monotonic timeline.
    pub start_time: f64,
    /// Displayed angle at the moment of the unlock request, radians.
    pub initial_angle: f64,
    /// Raw angle minus initial angle at the moment of the request, radians.
    pub delta_angle: f64,
}

/// Lock states of the stabilizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LockState {
    /// Displayed angle tracks the live raw angle.
    Free,
    /// Displayed angle snaps within the lock band.
    Locked,
    /// A spring animation is releasing the displayed angle back toward the
    /// live raw angle.
    Unlocking {
        /// Context captured when the unlock was requested.
        context: UnlockContext,
    },
}

impl LockState {
    /// Whether an unlock animation is in flight.
    pub fn is_unlocking(&self) -> bool {
        matches!(self, LockState::Unlocking { .. })
    }
}
