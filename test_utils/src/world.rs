//! Player layouts written into a [`FakeProcess`].

use glam::{Mat4, Vec3};
use sightline::constants::{DEFAULT_ENTITY_STRIDE, DEFAULT_RECOIL_SCALE};
use sightline::entity::{BONE_MATRIX_STRIDE, BONE_TRANSLATION};
use sightline::memory::{Address, GameProcess};
use sightline::numeric::slot_offset;
use sightline::offsets::Offsets;
use sightline::transform::SurfaceSize;

use crate::fake_process::FakeProcess;

/// Where the engine's client state lives in the fake process.
pub const CLIENT_STATE: Address = Address(0x3000_0000);
/// Entity-list slot that holds the viewer's weapon entity.
pub const WEAPON_SLOT: usize = 200;
/// Base address of the viewer's weapon entity.
pub const WEAPON_BASE: Address = Address(0x5000_0000);
/// Distance from a player's base to its bone table.
const BONE_TABLE_OFFSET: u64 = 0x10_0000;

/// Distinct offsets for a fake process.
#[must_use]
pub fn test_offsets() -> Offsets {
    Offsets {
        local_player: 0x100,
        entity_list: 0x1000,
        entity_stride: DEFAULT_ENTITY_STRIDE,
        view_matrix: 0x200,
        client_state: 0x300,
        client_state_view_angles: 0x20,
        team_num: 0xF4,
        life_state: 0x25F,
        health: 0x100,
        origin: 0x138,
        bone_matrix: 0x26A8,
        view_offset: 0x108,
        aim_punch_angle: 0x303C,
        fov_start: 0x31F4,
        active_weapon: 0x2F08,
        item_definition_index: 0x2FAA,
        recoil_scale: DEFAULT_RECOIL_SCALE,
    }
}

/// A player as the snapshot model reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLayout {
    /// Remote base address.
    pub base: Address,
    /// Raw team number.
    pub team: i32,
    /// Health.
    pub health: i32,
    /// Raw life-state flag; `true` means dead.
    pub dead: bool,
    /// Model origin.
    pub origin: Vec3,
    /// Bone translations to write. `None` leaves the bone pointer null.
    pub bones: Option<Vec<(usize, Vec3)>>,
}

impl PlayerLayout {
    /// A healthy player with a bone table but no bones written.
    #[must_use]
    pub fn new(base: Address, team: i32, origin: Vec3) -> Self {
        Self {
            base,
            team,
            health: 100,
            dead: false,
            origin,
            bones: Some(Vec::new()),
        }
    }

    /// Adds one bone translation.
    #[must_use]
    pub fn with_bone(mut self, index: usize, position: Vec3) -> Self {
        self.bones.get_or_insert_with(Vec::new).push((index, position));
        self
    }

    /// Overrides health.
    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Drops the bone table.
    #[must_use]
    pub fn without_bones(mut self) -> Self {
        self.bones = None;
        self
    }

    /// Address of the bone table.
    #[must_use]
    pub fn bone_table(&self) -> Address {
        self.base + BONE_TABLE_OFFSET
    }
}

/// The local viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerLayout {
    /// Shared player fields.
    pub player: PlayerLayout,
    /// Eye offset from the origin.
    pub view_offset: Vec3,
    /// Pitch, yaw and roll in degrees.
    pub view_angles: Vec3,
    /// Recoil punch in degrees.
    pub aim_punch: Vec3,
    /// Raw field of view; zero means unset.
    pub fov: i32,
    /// Item definition index of the held weapon, if any.
    pub weapon: Option<i32>,
    /// World-to-clip matrix.
    pub view_matrix: Mat4,
}

impl ViewerLayout {
    /// A viewer standing at `origin`, looking along `+X`, holding item 7.
    #[must_use]
    pub fn new(base: Address, team: i32, origin: Vec3) -> Self {
        Self {
            player: PlayerLayout::new(base, team, origin),
            view_offset: Vec3::new(0.0, 0.0, 64.0),
            view_angles: Vec3::ZERO,
            aim_punch: Vec3::ZERO,
            fov: 90,
            weapon: Some(7),
            view_matrix: Mat4::IDENTITY,
        }
    }
}

impl FakeProcess {
    /// Writes `player` and points entity-list `slot` at it.
    pub fn place_player(&self, offsets: &Offsets, slot: usize, player: &PlayerLayout) {
        self.write_address(self.slot_address(offsets, slot), player.base);
        self.write_player_fields(offsets, player);
    }

    /// Empties entity-list `slot`.
    pub fn clear_slot(&self, offsets: &Offsets, slot: usize) {
        self.clear_address(self.slot_address(offsets, slot));
    }

    /// Writes `viewer` and points the local-player global at it.
    pub fn place_viewer(&self, offsets: &Offsets, viewer: &ViewerLayout) {
        let base = viewer.player.base;
        let client = self.client_module();
        self.write_address(client + offsets.local_player, base);
        self.write_player_fields(offsets, &viewer.player);

        self.write_matrix(client + offsets.view_matrix, viewer.view_matrix);
        self.write_vec3(base + offsets.view_offset, viewer.view_offset);
        self.write_address(self.engine_module() + offsets.client_state, CLIENT_STATE);
        self.write_vec3(CLIENT_STATE + offsets.client_state_view_angles, viewer.view_angles);
        self.write_vec3(base + offsets.aim_punch_angle, viewer.aim_punch);
        self.write_i32(base + offsets.fov_start, viewer.fov);

        match viewer.weapon {
            Some(item) => {
                let handle = i32::try_from(WEAPON_SLOT + 1).unwrap_or(i32::MAX);
                self.write_i32(base + offsets.active_weapon, handle);
                self.write_address(self.slot_address(offsets, WEAPON_SLOT), WEAPON_BASE);
                self.write_i32(WEAPON_BASE + offsets.item_definition_index, item);
            }
            None => self.write_i32(base + offsets.active_weapon, 0),
        }
    }

    /// Points the local-player global at nothing.
    pub fn clear_viewer(&self, offsets: &Offsets) {
        self.clear_address(self.client_module() + offsets.local_player);
    }

    /// A camera looking down `+X` from the origin, with `w = x`.
    #[must_use]
    pub fn forward_camera() -> Mat4 {
        Mat4::from_cols(
            glam::Vec4::new(0.0, 0.0, 0.0, 1.0),
            glam::Vec4::new(-1.0, 0.0, 0.0, 0.0),
            glam::Vec4::new(0.0, 1.0, 0.0, 0.0),
            glam::Vec4::new(0.0, 0.0, 0.0, 0.0),
        )
    }

    /// Small surface used by projection tests.
    #[must_use]
    pub const fn small_surface() -> SurfaceSize {
        SurfaceSize::new(200, 100)
    }

    fn slot_address(&self, offsets: &Offsets, slot: usize) -> Address {
        self.client_module() + offsets.entity_list + slot_offset(slot, offsets.entity_stride)
    }

    fn write_player_fields(&self, offsets: &Offsets, player: &PlayerLayout) {
        let base = player.base;
        self.write_i32(base + offsets.team_num, player.team);
        self.write_bool(base + offsets.life_state, player.dead);
        self.write_i32(base + offsets.health, player.health);
        self.write_vec3(base + offsets.origin, player.origin);

        let Some(bones) = &player.bones else {
            self.clear_address(base + offsets.bone_matrix);
            return;
        };
        let table = player.bone_table();
        self.write_address(base + offsets.bone_matrix, table);
        let [x, y, z] = BONE_TRANSLATION;
        for &(index, position) in bones {
            let matrix = table + slot_offset(index, BONE_MATRIX_STRIDE);
            self.write_f32(matrix + x, position.x);
            self.write_f32(matrix + y, position.y);
            self.write_f32(matrix + z, position.z);
        }
    }
}
