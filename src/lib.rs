//! Entity snapshotting, screen projection and aim steering over a remote
//! game process.
//!
//! The crate is organised around three periodic loops and one hook
//! callback:
//!
//! - [`poller::EntityPoller`] reads the local [`entity::Viewer`] and every
//!   [`entity::Entity`] slot and publishes a [`snapshot::GameSnapshot`].
//! - [`steering::SteeringLoop`] selects a target with
//!   [`acquisition::TargetAcquisition`] and steers the pointer while the
//!   [`input::InputGate`] is engaged.
//! - An overlay reads the same snapshots through [`markers::screen_markers`].
//!
//! Memory access, pointer injection, keyboard polling and the pointer hook
//! are collaborator traits in [`memory`] and [`input`].
pub mod acquisition;
pub mod calibration;
pub mod constants;
pub mod entity;
pub mod input;
pub mod logging;
pub mod markers;
pub mod memory;
pub mod numeric;
pub mod offsets;
pub mod poller;
pub mod settings;
pub mod snapshot;
pub mod steering;
pub mod team;
pub mod threaded;
pub mod transform;
pub mod vector_math;
pub mod weapon;

pub use acquisition::{AcquisitionConfig, Target, TargetAcquisition};
pub use calibration::{calibrate, CalibrationError};
pub use entity::{Entity, EntityState, Viewer};
pub use input::{GateState, InputGate};
pub use logging::init as init_logging;
pub use memory::{Address, GameProcess, ProcessMemory, ReadExt};
pub use poller::EntityPoller;
pub use settings::{ConfigError, Settings};
pub use snapshot::{GameSnapshot, SnapshotCell};
pub use steering::{SteeringCollaborators, SteeringLoop};
pub use threaded::{spawn_frame_loop, CancelSignal, FrameAction, FrameLoop};
