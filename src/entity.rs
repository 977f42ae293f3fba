//! Per-entity state rebuilt from remote memory every poll.
//!
//! [`EntityState`] holds the fields every actor shares. [`Entity`] embeds it
//! for actors from the entity list and adds skeletal landmarks, while
//! [`Viewer`] embeds it for the local player and adds camera and aim state.
//! Both call [`EntityState::update`] explicitly before their own reads.
//!
//! Updates are best effort: once the base address resolves, the remaining
//! reads run unconditionally and a failed read simply leaves a zero value.

use glam::{Mat4, Vec3};
use log::trace;

use crate::constants::{DEFAULT_FOV, MAX_STUDIO_BONES};
use crate::memory::{Address, GameProcess, ProcessMemory, ReadExt};
use crate::numeric::slot_offset;
use crate::offsets::Offsets;
use crate::team::Team;
use crate::transform::CameraTransform;
use crate::vector_math::direction_from_euler;
use crate::weapon::WeaponId;

/// Size of one 3x4 bone matrix.
pub const BONE_MATRIX_STRIDE: u64 = 0x30;
/// Byte offsets of the translation column inside a bone matrix.
pub const BONE_TRANSLATION: [u64; 3] = [0x0C, 0x1C, 0x2C];
/// Floats in one bone matrix.
const BONE_MATRIX_FLOATS: usize = 12;
/// Entity handles carry the list slot (plus one) in their low bits.
pub const HANDLE_SLOT_MASK: i32 = 0xFFF;

/// Fields shared by every tracked actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityState {
    /// Remote base address; null when unresolved this cycle.
    pub address_base: Address,
    /// Set while the entity is dead.
    pub life_state: bool,
    /// Health points.
    pub health: i32,
    /// Team the entity plays on.
    pub team: Team,
    /// Model origin in world space.
    pub origin: Vec3,
}

impl EntityState {
    /// Returns `true` when the entity resolved, is not dead, has health and
    /// plays on one of the two sides.
    ///
    /// # Examples
    /// ```
    /// use sightline::entity::EntityState;
    /// use sightline::memory::Address;
    /// use sightline::team::Team;
    /// let mut state = EntityState {
    ///     address_base: Address(0x1000),
    ///     health: 100,
    ///     team: Team::Terrorists,
    ///     ..EntityState::default()
    /// };
    /// assert!(state.is_alive());
    /// state.health = 0;
    /// assert!(!state.is_alive());
    /// ```
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.address_base.is_null() && !self.life_state && self.health > 0 && self.team.is_playing()
    }

    /// Refreshes the shared fields from `address_base`.
    ///
    /// Returns `false` when the address is null, leaving every other field
    /// at its previous value, or when the entity belongs to
    /// `excluded_team`, in which case only the team has been refreshed.
    pub fn update(
        &mut self,
        memory: &dyn ProcessMemory,
        offsets: &Offsets,
        address_base: Address,
        excluded_team: Option<Team>,
    ) -> bool {
        self.address_base = address_base;
        if address_base.is_null() {
            return false;
        }

        self.team = Team::from_raw(memory.read(address_base + offsets.team_num));
        if excluded_team == Some(self.team) {
            return false;
        }

        self.life_state = memory.read(address_base + offsets.life_state);
        self.health = memory.read(address_base + offsets.health);
        self.origin = memory.read(address_base + offsets.origin);
        true
    }
}

/// An actor from the entity list.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Slot in the entity list.
    pub index: usize,
    /// Shared fields.
    pub state: EntityState,
    /// World positions of the skeletal bones. Empty when the bone table
    /// could not be resolved.
    pub bones: Vec<Vec3>,
}

impl Entity {
    /// Creates an unresolved entity for an entity-list slot.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            state: EntityState {
                address_base: Address::NULL,
                life_state: false,
                health: 0,
                team: Team::Unassigned,
                origin: Vec3::ZERO,
            },
            bones: Vec::new(),
        }
    }

    /// Liveness of the shared state.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Position of a skeletal landmark, if the bone table resolved.
    #[must_use]
    pub fn landmark(&self, bone: usize) -> Option<Vec3> {
        self.bones.get(bone).copied()
    }

    /// Refreshes the entity from its entity-list slot.
    ///
    /// Returns `false` when the slot is empty or the entity belongs to
    /// `excluded_team`.
    pub fn update(
        &mut self,
        process: &dyn GameProcess,
        offsets: &Offsets,
        excluded_team: Option<Team>,
    ) -> bool {
        let memory = process.memory();
        let slot = process.client_module()
            + offsets.entity_list
            + slot_offset(self.index, offsets.entity_stride);
        let address_base = memory.read(slot);
        if !self.state.update(memory, offsets, address_base, excluded_team) {
            return false;
        }

        self.read_bones(memory, offsets);
        trace!(
            "entity {} at {} team {:?} health {}",
            self.index,
            address_base,
            self.state.team,
            self.state.health
        );
        true
    }

    fn read_bones(&mut self, memory: &dyn ProcessMemory, offsets: &Offsets) {
        self.bones.clear();
        let table: Address = memory.read(self.state.address_base + offsets.bone_matrix);
        if table.is_null() {
            return;
        }

        // One bulk read covers every 3x4 matrix; only the translation column
        // is kept.
        let mut block = vec![0.0_f32; MAX_STUDIO_BONES * BONE_MATRIX_FLOATS];
        memory.read_f32_block(table, &mut block);
        self.bones.extend(block.chunks_exact(BONE_MATRIX_FLOATS).filter_map(
            |matrix| match *matrix {
                [_, _, _, x, _, _, _, y, _, _, _, z] => Some(Vec3::new(x, y, z)),
                _ => None,
            },
        ));
    }
}

/// Replaces the unset zero field of view with the canonical default.
///
/// # Examples
/// ```
/// use sightline::entity::normalize_fov;
/// assert_eq!(normalize_fov(0), 90);
/// assert_eq!(normalize_fov(75), 75);
/// ```
#[must_use]
pub const fn normalize_fov(raw: i32) -> i32 {
    if raw == 0 {
        DEFAULT_FOV
    } else {
        raw
    }
}

/// The local player, extended with camera and aim state.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    /// Shared fields.
    pub state: EntityState,
    /// Camera matrices of the last successful update.
    pub camera: CameraTransform,
    /// Local offset from the model origin to the eyes.
    pub view_offset: Vec3,
    /// Eye position in world space.
    pub eye_position: Vec3,
    /// View angles in degrees (pitch, yaw, roll).
    pub view_angles: Vec3,
    /// Recoil punch in degrees.
    pub aim_punch_angle: Vec3,
    /// Where the camera looks.
    pub eye_direction: Vec3,
    /// Where shots land: the view direction with scaled recoil folded in.
    pub aim_direction: Vec3,
    /// Vertical field of view in degrees, never zero.
    pub fov: i32,
    /// Item currently held.
    pub active_weapon: WeaponId,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            state: EntityState::default(),
            camera: CameraTransform::default(),
            view_offset: Vec3::ZERO,
            eye_position: Vec3::ZERO,
            view_angles: Vec3::ZERO,
            aim_punch_angle: Vec3::ZERO,
            eye_direction: Vec3::X,
            aim_direction: Vec3::X,
            fov: DEFAULT_FOV,
            active_weapon: WeaponId::INVALID,
        }
    }
}

impl Viewer {
    /// Liveness of the shared state.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Projects a world point with this cycle's camera.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec3) -> Vec3 {
        self.camera.world_to_screen(point)
    }

    /// Refreshes the viewer. The viewer never filters out its own team.
    ///
    /// Returns `false` when the local player is unresolved.
    pub fn update(&mut self, process: &dyn GameProcess, offsets: &Offsets) -> bool {
        let memory = process.memory();
        let client = process.client_module();
        let address_base = memory.read(client + offsets.local_player);
        if !self.state.update(memory, offsets, address_base, None) {
            return false;
        }

        let world_to_clip: Mat4 = memory.read(client + offsets.view_matrix);
        self.camera.update(world_to_clip, process.surface_size());

        self.view_offset = memory.read(address_base + offsets.view_offset);
        self.eye_position = self.state.origin + self.view_offset;
        let client_state: Address = memory.read(process.engine_module() + offsets.client_state);
        self.view_angles = memory.read(client_state + offsets.client_state_view_angles);
        self.aim_punch_angle = memory.read(address_base + offsets.aim_punch_angle);
        self.fov = normalize_fov(memory.read(address_base + offsets.fov_start));
        self.active_weapon = read_active_weapon(process, offsets, address_base);

        self.eye_direction = direction_from_euler(
            self.view_angles.x.to_radians(),
            self.view_angles.y.to_radians(),
        );
        let recoil = self.aim_punch_angle * offsets.recoil_scale;
        self.aim_direction = direction_from_euler(
            (self.view_angles.x + recoil.x).to_radians(),
            (self.view_angles.y + recoil.y).to_radians(),
        );
        true
    }
}

fn read_active_weapon(process: &dyn GameProcess, offsets: &Offsets, owner: Address) -> WeaponId {
    let memory = process.memory();
    let handle: i32 = memory.read(owner + offsets.active_weapon);
    let Some(slot) = usize::try_from((handle & HANDLE_SLOT_MASK) - 1).ok() else {
        return WeaponId::INVALID;
    };
    let weapon: Address = memory.read(
        process.client_module() + offsets.entity_list + slot_offset(slot, offsets.entity_stride),
    );
    if weapon.is_null() {
        return WeaponId::INVALID;
    }
    WeaponId(memory.read(weapon + offsets.item_definition_index))
}
