//! Entity and viewer updates against an in-memory process.

use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use glam::Vec3;
use rstest::{fixture, rstest};
use sightline::constants::{DEFAULT_BONE_INDEX, DEFAULT_FOV, MAX_STUDIO_BONES};
use sightline::entity::{Entity, EntityState, Viewer};
use sightline::memory::{Address, GameProcess, ProcessMemory};
use sightline::offsets::Offsets;
use sightline::team::Team;
use sightline::transform::SurfaceSize;
use sightline::weapon::WeaponId;
use test_utils::{test_offsets, FakeProcess, PlayerLayout, ViewerLayout};

const VIEWER_BASE: Address = Address(0x4000_0000);
const ENEMY_BASE: Address = Address(0x4100_0000);

#[fixture]
fn world() -> (FakeProcess, Offsets) {
    (FakeProcess::new(), test_offsets())
}

#[rstest]
#[case::zero(0)]
#[case::negative(-12)]
fn no_health_is_never_alive(#[case] health: i32) {
    let state = EntityState {
        address_base: ENEMY_BASE,
        health,
        team: Team::Terrorists,
        life_state: false,
        origin: Vec3::ONE,
    };
    assert!(!state.is_alive());
}

#[rstest]
fn entity_reads_fields_and_landmark(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    let head = Vec3::new(10.0, 20.0, 70.0);
    process.place_player(
        &offsets,
        3,
        &PlayerLayout::new(ENEMY_BASE, 2, Vec3::new(10.0, 20.0, 0.0))
            .with_health(57)
            .with_bone(DEFAULT_BONE_INDEX, head),
    );

    let mut entity = Entity::new(3);
    assert!(entity.update(&process, &offsets, None));
    assert!(entity.is_alive());
    assert_eq!(entity.state.address_base, ENEMY_BASE);
    assert_eq!(entity.state.team, Team::Terrorists);
    assert_eq!(entity.state.health, 57);
    assert_eq!(entity.state.origin, Vec3::new(10.0, 20.0, 0.0));
    assert_eq!(entity.landmark(DEFAULT_BONE_INDEX), Some(head));
    assert_eq!(entity.landmark(0), Some(Vec3::ZERO));
}

/// Counts float reads on their way to a [`FakeProcess`].
#[derive(Default)]
struct CountingProcess {
    inner: FakeProcess,
    floats: AtomicUsize,
    blocks: AtomicUsize,
}

impl ProcessMemory for CountingProcess {
    fn read_u8(&self, address: Address) -> u8 {
        self.inner.read_u8(address)
    }

    fn read_i32(&self, address: Address) -> i32 {
        self.inner.read_i32(address)
    }

    fn read_f32(&self, address: Address) -> f32 {
        self.floats.fetch_add(1, Ordering::SeqCst);
        self.inner.read_f32(address)
    }

    fn read_address(&self, address: Address) -> Address {
        self.inner.read_address(address)
    }

    fn read_f32_block(&self, address: Address, values: &mut [f32]) {
        self.blocks.fetch_add(1, Ordering::SeqCst);
        self.inner.read_f32_block(address, values);
    }
}

impl GameProcess for CountingProcess {
    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    fn memory(&self) -> &dyn ProcessMemory {
        self
    }

    fn client_module(&self) -> Address {
        self.inner.client_module()
    }

    fn engine_module(&self) -> Address {
        self.inner.engine_module()
    }

    fn surface_size(&self) -> SurfaceSize {
        self.inner.surface_size()
    }
}

#[rstest]
fn bone_table_is_fetched_in_one_block() {
    let process = CountingProcess::default();
    let offsets = test_offsets();
    let head = Vec3::new(1.0, 2.0, 3.0);
    process.inner.place_player(
        &offsets,
        4,
        &PlayerLayout::new(ENEMY_BASE, 2, Vec3::ZERO).with_bone(DEFAULT_BONE_INDEX, head),
    );

    let mut entity = Entity::new(4);
    assert!(entity.update(&process, &offsets, None));
    assert_eq!(process.blocks.load(Ordering::SeqCst), 1);
    // Only the origin is read float by float.
    assert_eq!(process.floats.load(Ordering::SeqCst), 3);
    assert_eq!(entity.bones.len(), MAX_STUDIO_BONES);
    assert_eq!(entity.landmark(DEFAULT_BONE_INDEX), Some(head));
}

#[rstest]
fn missing_bone_table_yields_no_landmark(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    process.place_player(
        &offsets,
        1,
        &PlayerLayout::new(ENEMY_BASE, 3, Vec3::ZERO).without_bones(),
    );
    let mut entity = Entity::new(1);
    assert!(entity.update(&process, &offsets, None));
    assert_eq!(entity.landmark(DEFAULT_BONE_INDEX), None);
}

#[rstest]
fn excluded_team_short_circuits(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    process.place_player(&offsets, 2, &PlayerLayout::new(ENEMY_BASE, 3, Vec3::ONE));
    let mut entity = Entity::new(2);
    assert!(!entity.update(&process, &offsets, Some(Team::CounterTerrorists)));
    assert!(entity.update(&process, &offsets, Some(Team::Terrorists)));
}

#[rstest]
fn unresolved_slot_keeps_prior_fields(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    process.place_player(
        &offsets,
        4,
        &PlayerLayout::new(ENEMY_BASE, 2, Vec3::new(1.0, 2.0, 3.0)).with_health(80),
    );
    let mut entity = Entity::new(4);
    assert!(entity.update(&process, &offsets, None));

    process.clear_slot(&offsets, 4);
    assert!(!entity.update(&process, &offsets, None));
    assert!(entity.state.address_base.is_null());
    assert!(!entity.is_alive());
    assert_eq!(entity.state.health, 80);
    assert_eq!(entity.state.origin, Vec3::new(1.0, 2.0, 3.0));
}

#[rstest]
fn unset_fov_becomes_default(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    let mut layout = ViewerLayout::new(VIEWER_BASE, 3, Vec3::ZERO);
    layout.fov = 0;
    process.place_viewer(&offsets, &layout);

    let mut viewer = Viewer::default();
    assert!(viewer.update(&process, &offsets));
    assert_eq!(viewer.fov, DEFAULT_FOV);
}

#[rstest]
fn viewer_derives_eye_and_aim(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    let mut layout = ViewerLayout::new(VIEWER_BASE, 3, Vec3::new(100.0, 0.0, 0.0));
    layout.fov = 70;
    layout.aim_punch = Vec3::new(0.0, 5.0, 0.0);
    process.place_viewer(&offsets, &layout);

    let mut viewer = Viewer::default();
    assert!(viewer.update(&process, &offsets));
    assert_eq!(viewer.fov, 70);
    assert_eq!(viewer.eye_position, Vec3::new(100.0, 0.0, 64.0));
    assert_relative_eq!(viewer.eye_direction.x, 1.0, epsilon = 1e-6);

    // Recoil is doubled before it bends the aim.
    let yaw = 10_f32.to_radians();
    assert_relative_eq!(viewer.aim_direction.x, yaw.cos(), epsilon = 1e-6);
    assert_relative_eq!(viewer.aim_direction.y, yaw.sin(), epsilon = 1e-6);
    assert_relative_eq!(viewer.aim_direction.z, 0.0, epsilon = 1e-6);
}

#[rstest]
#[case::knife(Some(42), WeaponId::KNIFE)]
#[case::rifle(Some(7), WeaponId::AK47)]
#[case::empty_hands(None, WeaponId::INVALID)]
fn viewer_resolves_active_weapon(
    world: (FakeProcess, Offsets),
    #[case] item: Option<i32>,
    #[case] expected: WeaponId,
) {
    let (process, offsets) = world;
    let mut layout = ViewerLayout::new(VIEWER_BASE, 2, Vec3::ZERO);
    layout.weapon = item;
    process.place_viewer(&offsets, &layout);

    let mut viewer = Viewer::default();
    assert!(viewer.update(&process, &offsets));
    assert_eq!(viewer.active_weapon, expected);
}

#[rstest]
fn viewer_reads_camera_matrix(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    let mut layout = ViewerLayout::new(VIEWER_BASE, 2, Vec3::ZERO);
    layout.view_matrix = FakeProcess::forward_camera();
    process.place_viewer(&offsets, &layout);
    process.set_surface(FakeProcess::small_surface());

    let mut viewer = Viewer::default();
    assert!(viewer.update(&process, &offsets));
    assert_eq!(viewer.camera.world_to_clip(), FakeProcess::forward_camera());
    let screen = viewer.world_to_screen(Vec3::new(10.0, -5.0, 5.0));
    assert_relative_eq!(screen.x, 150.0);
    assert_relative_eq!(screen.y, 25.0);
}

#[rstest]
fn missing_local_player_fails_update(world: (FakeProcess, Offsets)) {
    let (process, offsets) = world;
    let mut viewer = Viewer::default();
    assert!(!viewer.update(&process, &offsets));
    assert!(!viewer.is_alive());
}
