//! Target acquisition and steering loop.
//!
//! The loop reads the latest published snapshot, and while the input gate
//! is engaged it steers the pointer toward the selected target and reissues
//! the swallowed press. Steering is suspended while the calibration chord
//! is held, and [`calibrate`] runs once per hold.
//!
//! The pointer hook runs on its own thread and only touches the gate
//! through [`SteeringHookHandler`].

use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread;

use glam::IVec2;
use log::{debug, info, warn};

use crate::acquisition::{steering_pixels, AcquisitionConfig, TargetAcquisition};
use crate::calibration::calibrate;
use crate::input::{
    chord_held, Eligibility, GateState, HookError, HookVerdict, InputGate, Key, KeyboardState,
    PointerEvent, PointerEventHandler, PointerHook, PointerInput,
};
use crate::memory::GameProcess;
use crate::settings::{ConfigError, Hotkeys, Settings, TimingSettings};
use crate::snapshot::SnapshotCell;
use crate::threaded::FrameAction;

/// External pieces the steering loop drives.
pub struct SteeringCollaborators {
    /// Attached game process.
    pub process: Arc<dyn GameProcess>,
    /// Snapshots published by the poller.
    pub snapshots: Arc<SnapshotCell>,
    /// Gate shared with the hook thread.
    pub gate: Arc<InputGate>,
    /// Pointer injection.
    pub pointer: Arc<dyn PointerInput>,
    /// Polled keyboard.
    pub keyboard: Arc<dyn KeyboardState>,
    /// Low-level pointer hook.
    pub hook: Box<dyn PointerHook>,
}

/// Decides the fate of real button events on the hook thread.
pub struct SteeringHookHandler {
    process: Arc<dyn GameProcess>,
    snapshots: Arc<SnapshotCell>,
    gate: Arc<InputGate>,
    keyboard: Arc<dyn KeyboardState>,
    competing_feature: Key,
}

impl SteeringHookHandler {
    /// Current interception conditions.
    #[must_use]
    pub fn eligibility(&self) -> Eligibility {
        let snapshot = self.snapshots.load();
        Eligibility {
            process_valid: self.process.is_valid(),
            viewer_alive: snapshot.viewer.is_alive(),
            competing_feature_engaged: self.keyboard.is_key_down(self.competing_feature),
            item_allowed: !snapshot.viewer.active_weapon.is_disallowed(),
        }
    }
}

impl PointerEventHandler for SteeringHookHandler {
    fn handle(&self, event: PointerEvent) -> HookVerdict {
        self.gate.on_event(event, || self.eligibility())
    }
}

/// The steering frame action.
pub struct SteeringLoop {
    process: Arc<dyn GameProcess>,
    snapshots: Arc<SnapshotCell>,
    gate: Arc<InputGate>,
    pointer: Arc<dyn PointerInput>,
    keyboard: Arc<dyn KeyboardState>,
    hook: Box<dyn PointerHook>,
    hook_installed: bool,
    acquisition: TargetAcquisition,
    angle_per_pixel: f64,
    hotkeys: Hotkeys,
    timing: TimingSettings,
    chord_was_held: bool,
}

impl SteeringLoop {
    /// Builds the loop from validated settings.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] in `settings`.
    pub fn new(
        collaborators: SteeringCollaborators,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let acquisition = TargetAcquisition::new(settings.acquisition())?;
        let SteeringCollaborators {
            process,
            snapshots,
            gate,
            pointer,
            keyboard,
            hook,
        } = collaborators;
        Ok(Self {
            process,
            snapshots,
            gate,
            pointer,
            keyboard,
            hook,
            hook_installed: false,
            acquisition,
            angle_per_pixel: settings.calibration.angle_per_pixel,
            hotkeys: settings.hotkeys.clone(),
            timing: settings.timing.clone(),
            chord_was_held: false,
        })
    }

    /// Installs the pointer hook. Call before spawning the loop.
    ///
    /// # Errors
    /// Returns the hook's [`HookError`].
    pub fn start(&mut self) -> Result<(), HookError> {
        if self.hook_installed {
            return Err(HookError::AlreadyInstalled);
        }
        self.hook.install(Arc::new(self.hook_handler()))?;
        self.hook_installed = true;
        info!("pointer hook installed");
        Ok(())
    }

    /// A handler sharing this loop's gate and inputs.
    #[must_use]
    pub fn hook_handler(&self) -> SteeringHookHandler {
        SteeringHookHandler {
            process: Arc::clone(&self.process),
            snapshots: Arc::clone(&self.snapshots),
            gate: Arc::clone(&self.gate),
            keyboard: Arc::clone(&self.keyboard),
            competing_feature: self.hotkeys.competing_feature,
        }
    }

    /// Shared input gate.
    #[must_use]
    pub const fn gate(&self) -> &Arc<InputGate> {
        &self.gate
    }

    /// Pointer ratio in radians per pixel at the reference field of view.
    #[must_use]
    pub const fn angle_per_pixel(&self) -> f64 {
        self.angle_per_pixel
    }

    /// Replaces the pointer ratio.
    ///
    /// # Errors
    /// Returns [`ConfigError::AnglePerPixel`] for a non-finite or
    /// non-positive ratio and keeps the current one.
    pub fn set_angle_per_pixel(&mut self, ratio: f64) -> Result<(), ConfigError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            warn!("rejected angle per pixel {ratio}, keeping {}", self.angle_per_pixel);
            return Err(ConfigError::AnglePerPixel(ratio));
        }
        self.angle_per_pixel = ratio;
        Ok(())
    }

    /// Active targeting configuration.
    #[must_use]
    pub const fn acquisition(&self) -> &AcquisitionConfig {
        self.acquisition.config()
    }

    /// Swaps the targeting configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] and keeps the current configuration.
    pub fn reconfigure(&mut self, config: AcquisitionConfig) -> Result<(), ConfigError> {
        self.acquisition.reconfigure(config)
    }

    /// Runs one steering cycle.
    pub fn step(&mut self) -> ControlFlow<()> {
        if !self.process.is_valid() {
            warn!("game process invalid, steering loop stopping");
            return ControlFlow::Break(());
        }

        let snapshot = self.snapshots.load();
        if !snapshot.viewer.is_alive() {
            return ControlFlow::Continue(());
        }

        let chord = chord_held(self.keyboard.as_ref(), &self.hotkeys.calibrate);
        let chord_pressed = chord && !self.chord_was_held;
        self.chord_was_held = chord;
        if chord {
            // Calibration owns the pointer for as long as the chord is held.
            if chord_pressed {
                self.run_calibration();
            }
            return ControlFlow::Continue(());
        }

        if !self.gate.is_engaged() {
            return ControlFlow::Continue(());
        }

        let pixels = self
            .acquisition
            .select_target(&snapshot.entities, &snapshot.viewer)
            .map_or(IVec2::ZERO, |target| {
                debug!(
                    "target {} at {} rad",
                    target.entity_index, target.angle_size
                );
                steering_pixels(target.steering, self.angle_per_pixel, snapshot.viewer.fov)
            });
        let pressed = self.gate.confirm_suppressed();
        if pressed {
            self.pointer.press_button();
        }
        let moved = pixels != IVec2::ZERO;
        if moved {
            self.pointer.move_pointer(pixels.x, pixels.y);
        }
        if moved || pressed {
            thread::sleep(self.timing.input_settle());
        }
        ControlFlow::Continue(())
    }

    fn run_calibration(&mut self) {
        info!("calibration started");
        let snapshots = Arc::clone(&self.snapshots);
        let look = move || {
            let snapshot = snapshots.load();
            snapshot
                .viewer
                .is_alive()
                .then_some(snapshot.viewer.eye_direction)
        };
        match calibrate(look, self.pointer.as_ref(), self.timing.calibration_settle()) {
            Ok(ratio) => self.angle_per_pixel = ratio,
            Err(err) => warn!("calibration failed, keeping {}: {err}", self.angle_per_pixel),
        }
    }
}

impl FrameAction for SteeringLoop {
    fn name(&self) -> &'static str {
        "steering"
    }

    fn frame(&mut self) -> ControlFlow<()> {
        self.step()
    }

    fn teardown(&mut self) {
        if self.hook_installed {
            self.hook.uninstall();
            self.hook_installed = false;
            info!("pointer hook uninstalled");
        }
        if self.gate.reset() != GateState::Released {
            self.pointer.release_button();
        }
    }
}
