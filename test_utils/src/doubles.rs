//! Recording collaborators for the steering loop.

use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::Mutex;
use sightline::input::{
    HookError, HookVerdict, Key, KeyboardState, PointerEvent, PointerEventHandler, PointerHook,
    PointerInput,
};

/// One call made on a [`RecordingPointer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCall {
    /// Relative move.
    Move(i32, i32),
    /// Synthetic button-down.
    Press,
    /// Synthetic button-up.
    Release,
}

/// Pointer that records every call.
#[derive(Debug, Default)]
pub struct RecordingPointer {
    calls: Mutex<Vec<PointerCall>>,
}

impl RecordingPointer {
    /// Everything recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<PointerCall> {
        self.calls.lock().clone()
    }

    /// Number of synthetic presses.
    #[must_use]
    pub fn presses(&self) -> usize {
        self.count(|call| matches!(call, PointerCall::Press))
    }

    /// Number of synthetic releases.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.count(|call| matches!(call, PointerCall::Release))
    }

    /// Recorded moves in order.
    #[must_use]
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match *call {
                PointerCall::Move(dx, dy) => Some((dx, dy)),
                PointerCall::Press | PointerCall::Release => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&PointerCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }
}

impl PointerInput for RecordingPointer {
    fn move_pointer(&self, dx: i32, dy: i32) {
        self.calls.lock().push(PointerCall::Move(dx, dy));
    }

    fn press_button(&self) {
        self.calls.lock().push(PointerCall::Press);
    }

    fn release_button(&self) {
        self.calls.lock().push(PointerCall::Release);
    }
}

/// Keyboard whose held keys are set by the test.
#[derive(Debug, Default)]
pub struct ScriptedKeyboard {
    held: Mutex<HashSet<Key>>,
}

impl ScriptedKeyboard {
    /// Holds or releases `key`.
    pub fn set(&self, key: Key, down: bool) {
        let mut held = self.held.lock();
        if down {
            held.insert(key);
        } else {
            held.remove(&key);
        }
    }
}

impl KeyboardState for ScriptedKeyboard {
    fn is_key_down(&self, key: Key) -> bool {
        self.held.lock().contains(&key)
    }
}

#[derive(Default)]
struct HookSlot {
    handler: Option<Arc<dyn PointerEventHandler>>,
    installs: usize,
    uninstalls: usize,
}

/// Hook whose events are fired by the test. Clones share one subscription.
#[derive(Clone, Default)]
pub struct RecordingHook {
    slot: Arc<Mutex<HookSlot>>,
}

impl RecordingHook {
    /// Delivers `event` to the installed handler, as the hook thread would.
    ///
    /// Without a handler the event passes through.
    pub fn fire(&self, event: PointerEvent) -> HookVerdict {
        // Clone out so the handler runs without this lock held.
        let installed = self.slot.lock().handler.clone();
        installed.map_or(HookVerdict::PassThrough, |handler| handler.handle(event))
    }

    /// Returns `true` while a handler is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.slot.lock().handler.is_some()
    }

    /// Number of successful installs.
    #[must_use]
    pub fn installs(&self) -> usize {
        self.slot.lock().installs
    }

    /// Number of uninstall calls.
    #[must_use]
    pub fn uninstalls(&self) -> usize {
        self.slot.lock().uninstalls
    }
}

impl PointerHook for RecordingHook {
    fn install(&mut self, handler: Arc<dyn PointerEventHandler>) -> Result<(), HookError> {
        let mut slot = self.slot.lock();
        if slot.handler.is_some() {
            return Err(HookError::AlreadyInstalled);
        }
        slot.handler = Some(handler);
        slot.installs += 1;
        Ok(())
    }

    fn uninstall(&mut self) {
        let mut slot = self.slot.lock();
        slot.handler = None;
        slot.uninstalls += 1;
    }
}
