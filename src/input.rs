//! Pointer-button gate shared by the input hook and the steering loop.
//!
//! The hook thread sees every real button event. A press that arrives while
//! the gate is [`GateState::Released`] and steering is eligible is swallowed
//! and the gate moves to [`GateState::SuppressedDown`]. The steering loop
//! later confirms it, reissuing a synthetic press, and the gate moves to
//! [`GateState::ConfirmedDown`]. A real release always returns the gate to
//! [`GateState::Released`].
//!
//! All transitions happen under one mutex and no other lock is taken while
//! it is held.

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Low-level pointer-button event delivered by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Primary button pressed.
    ButtonDown,
    /// Primary button released.
    ButtonUp,
    /// Any other pointer message.
    Other,
}

/// What the hook should do with the event it delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookVerdict {
    /// Forward the event to the rest of the system.
    PassThrough,
    /// Swallow the event.
    Suppress,
}

/// Gate states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateState {
    /// No button held.
    #[default]
    Released,
    /// A real press was swallowed and awaits confirmation.
    SuppressedDown,
    /// The swallowed press was reissued programmatically.
    ConfirmedDown,
}

/// Conditions that must all hold for a press to be intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// The game process is attached and valid.
    pub process_valid: bool,
    /// The local viewer is alive.
    pub viewer_alive: bool,
    /// The competing trigger feature is engaged.
    pub competing_feature_engaged: bool,
    /// The held item may be steered (not a knife or grenade).
    pub item_allowed: bool,
}

impl Eligibility {
    /// Returns `true` when a press may be intercepted.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.process_valid
            && self.viewer_alive
            && !self.competing_feature_engaged
            && self.item_allowed
    }
}

/// The three-state gate.
#[derive(Debug, Default)]
pub struct InputGate {
    state: Mutex<GateState>,
}

impl InputGate {
    /// Creates a released gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    /// Returns `true` unless the gate is released.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.state() != GateState::Released
    }

    /// Applies a hook event.
    ///
    /// `eligibility` is evaluated only for presses, before the gate lock is
    /// taken, so it may read other shared state.
    pub fn on_event(
        &self,
        event: PointerEvent,
        eligibility: impl FnOnce() -> Eligibility,
    ) -> HookVerdict {
        match event {
            PointerEvent::ButtonUp => {
                *self.state.lock() = GateState::Released;
                HookVerdict::PassThrough
            }
            PointerEvent::ButtonDown => {
                if !eligibility().is_eligible() {
                    return HookVerdict::PassThrough;
                }
                let mut state = self.state.lock();
                if *state == GateState::Released {
                    *state = GateState::SuppressedDown;
                    HookVerdict::Suppress
                } else {
                    HookVerdict::PassThrough
                }
            }
            PointerEvent::Other => HookVerdict::PassThrough,
        }
    }

    /// Moves a suppressed press to confirmed.
    ///
    /// Returns `true` exactly once per suppressed press; the caller then owes
    /// one synthetic button-down.
    pub fn confirm_suppressed(&self) -> bool {
        let mut state = self.state.lock();
        if *state == GateState::SuppressedDown {
            *state = GateState::ConfirmedDown;
            true
        } else {
            false
        }
    }

    /// Forces the gate to released, returning the previous state.
    pub fn reset(&self) -> GateState {
        let previous = std::mem::take(&mut *self.state.lock());
        debug!("input gate reset from {previous:?}");
        previous
    }
}

/// Keys the steering loop polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Either Alt key.
    Alt,
    /// Either Shift key.
    Shift,
    /// Either Control key.
    Control,
    /// Side pointer button one.
    XButton1,
    /// Side pointer button two.
    XButton2,
    /// Function key 9.
    F9,
    /// Function key 10.
    F10,
    /// Function key 11.
    F11,
    /// Function key 12.
    F12,
}

/// Pointer injection collaborator. Calls are fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait PointerInput: Send + Sync {
    /// Moves the pointer by a relative displacement.
    fn move_pointer(&self, dx: i32, dy: i32);
    /// Issues a synthetic primary button-down.
    fn press_button(&self);
    /// Issues a synthetic primary button-up.
    fn release_button(&self);
}

/// Polled keyboard state.
#[cfg_attr(test, mockall::automock)]
pub trait KeyboardState: Send + Sync {
    /// Returns `true` while `key` is held.
    fn is_key_down(&self, key: Key) -> bool;
}

/// Returns `true` when every key of `chord` is held. An empty chord is
/// never held.
#[must_use]
pub fn chord_held(keyboard: &dyn KeyboardState, chord: &[Key]) -> bool {
    !chord.is_empty() && chord.iter().all(|&key| keyboard.is_key_down(key))
}

/// Receives events on the hook thread. Must return quickly.
pub trait PointerEventHandler: Send + Sync {
    /// Decides the fate of one event.
    fn handle(&self, event: PointerEvent) -> HookVerdict;
}

/// Failure reported by the hook collaborator.
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook could not be installed.
    #[error("failed to install pointer hook: {0}")]
    Install(String),
    /// A handler is already installed.
    #[error("pointer hook already installed")]
    AlreadyInstalled,
}

/// Low-level pointer hook subscription.
pub trait PointerHook: Send {
    /// Starts delivering events to `handler`.
    ///
    /// # Errors
    /// Returns [`HookError`] when the subscription fails.
    fn install(&mut self, handler: Arc<dyn PointerEventHandler>) -> Result<(), HookError>;
    /// Stops delivering events. Uninstalling twice is harmless.
    fn uninstall(&mut self);
}
