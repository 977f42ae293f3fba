//! Utility helpers for tests.
//!
//! [`FakeProcess`] is an in-memory stand-in for the attached game process.
//! [`world`] lays out players in it the way the snapshot model expects and
//! [`doubles`] records what the steering loop does with the pointer.
pub mod doubles;
pub mod fake_process;
pub mod world;

pub use doubles::{RecordingHook, RecordingPointer, ScriptedKeyboard};
pub use fake_process::FakeProcess;
pub use world::{test_offsets, PlayerLayout, ViewerLayout};
