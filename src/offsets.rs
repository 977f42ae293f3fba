//! Remote layout of the structures the snapshot model reads.
//!
//! No offsets are built in: they change with every game build and are
//! supplied through [`crate::settings::Settings`].

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENTITY_STRIDE, DEFAULT_RECOIL_SCALE};

/// Offsets of globals (relative to a module base) and of entity fields
/// (relative to an entity's base address).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    /// Client-module global holding the local player's base address.
    pub local_player: u64,
    /// Client-module start of the entity list.
    pub entity_list: u64,
    /// Bytes between entity-list slots.
    #[serde(default = "default_entity_stride")]
    pub entity_stride: u64,
    /// Client-module world-to-clip matrix.
    pub view_matrix: u64,
    /// Engine-module global holding the client-state address.
    pub client_state: u64,
    /// View angles inside the client state.
    pub client_state_view_angles: u64,
    /// Entity team number.
    pub team_num: u64,
    /// Entity life-state flag.
    pub life_state: u64,
    /// Entity health.
    pub health: u64,
    /// Entity model origin.
    pub origin: u64,
    /// Entity pointer to its bone matrices.
    pub bone_matrix: u64,
    /// Local offset from origin to the eyes.
    pub view_offset: u64,
    /// Aim punch (recoil) angles.
    pub aim_punch_angle: u64,
    /// Field of view requested by the player.
    pub fov_start: u64,
    /// Handle of the active weapon.
    pub active_weapon: u64,
    /// Item definition index inside a weapon entity.
    pub item_definition_index: u64,
    /// Multiplier applied to the aim punch to get the effective aim.
    #[serde(default = "default_recoil_scale")]
    pub recoil_scale: f32,
}

const fn default_entity_stride() -> u64 {
    DEFAULT_ENTITY_STRIDE
}

const fn default_recoil_scale() -> f32 {
    DEFAULT_RECOIL_SCALE
}

#[cfg(test)]
impl Offsets {
    /// Distinct small offsets for unit tests.
    pub(crate) const fn sample() -> Self {
        Self {
            local_player: 0x10,
            entity_list: 0x20,
            entity_stride: DEFAULT_ENTITY_STRIDE,
            view_matrix: 0x30,
            client_state: 0x40,
            client_state_view_angles: 0x50,
            team_num: 0x60,
            life_state: 0x70,
            health: 0x80,
            origin: 0x90,
            bone_matrix: 0xA0,
            view_offset: 0xB0,
            aim_punch_angle: 0xC0,
            fov_start: 0xD0,
            active_weapon: 0xE0,
            item_definition_index: 0xF0,
            recoil_scale: DEFAULT_RECOIL_SCALE,
        }
    }
}
