//! Target selection and steering.
//!
//! Candidates are measured by the angle between the viewer's effective aim
//! direction and the direction to a skeletal landmark. The closest
//! candidate inside the targeting cone wins; ties keep the first seen. The
//! winning offset is split into a yaw-like and a pitch-like signed angle and
//! damped by the smoothing divisor.

use glam::{IVec2, Vec2, Vec3};
use log::{debug, info, warn};

use crate::constants::{
    DEFAULT_AIM_FOV_DEGREES, DEFAULT_BONE_INDEX, DEFAULT_SMOOTHING, REFERENCE_FOV,
};
use crate::entity::{normalize_fov, Entity, Viewer};
use crate::numeric::round_to_i32;
use crate::settings::ConfigError;
use crate::vector_math::{angle_between, signed_angle, UP};

/// Targeting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionConfig {
    /// Half-angle of the targeting cone in radians.
    pub fov_radians: f32,
    /// Skeletal landmark to aim for.
    pub bone_index: usize,
    /// Damping divisor. Values below 1 behave as 1.
    pub smoothing: f32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            fov_radians: DEFAULT_AIM_FOV_DEGREES.to_radians(),
            bone_index: DEFAULT_BONE_INDEX,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// The chosen candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Entity-list slot of the candidate.
    pub entity_index: usize,
    /// Unsigned angle between aim and landmark in radians.
    pub angle_size: f32,
    /// Smoothed signed steering angles: `x` yaw-like, `y` pitch-like.
    pub steering: Vec2,
}

/// Angular offset from an aim direction to a world point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimOffset {
    /// Unsigned angle in radians.
    pub angle_size: f32,
    /// Signed angles around the up axis and around the desired direction's
    /// horizontal normal.
    pub angles: Vec2,
}

/// Measures how far `aim_direction` is from pointing at `point`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use sightline::acquisition::aim_offset;
/// let offset = aim_offset(Vec3::X, Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));
/// assert!((offset.angle_size - 45_f32.to_radians()).abs() < 1e-5);
/// // Target to the left: the aim must turn left, which is a negative yaw.
/// assert!(offset.angles.x < 0.0);
/// ```
#[must_use]
pub fn aim_offset(aim_direction: Vec3, eye_position: Vec3, point: Vec3) -> AimOffset {
    let desired = (point - eye_position).normalize_or_zero();
    let angle_size = angle_between(aim_direction, desired);
    let pitch_axis = desired.cross(UP).normalize_or_zero();
    AimOffset {
        angle_size,
        angles: Vec2::new(
            signed_angle(desired, aim_direction, UP),
            signed_angle(desired, aim_direction, pitch_axis),
        ),
    }
}

/// Converts steering angles into pointer pixels.
///
/// The calibrated ratio holds at the reference field of view, so it is
/// rescaled by the viewer's current field of view.
///
/// # Examples
/// ```
/// use glam::{IVec2, Vec2};
/// use sightline::acquisition::steering_pixels;
/// let pixels = steering_pixels(Vec2::new(0.01, -0.005), 0.001, 90);
/// assert_eq!(pixels, IVec2::new(10, -5));
/// let zoomed = steering_pixels(Vec2::new(0.01, -0.005), 0.001, 45);
/// assert_eq!(zoomed, IVec2::new(20, -10));
/// ```
#[must_use]
pub fn steering_pixels(angles: Vec2, angle_per_pixel: f64, fov_degrees: i32) -> IVec2 {
    let fov_ratio = REFERENCE_FOV / f64::from(normalize_fov(fov_degrees));
    let axis = |angle: f32| round_to_i32(f64::from(angle) / angle_per_pixel * fov_ratio);
    IVec2::new(axis(angles.x), axis(angles.y))
}

/// Stateless target selector configured at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetAcquisition {
    config: AcquisitionConfig,
}

impl TargetAcquisition {
    /// Builds a selector.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for an unusable cone, bone or smoothing.
    pub fn new(config: AcquisitionConfig) -> Result<Self, ConfigError> {
        config
            .validate()
            .inspect_err(|err| warn!("rejected targeting configuration {config:?}: {err}"))?;
        debug!("target acquisition configured: {config:?}");
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Swaps in a new configuration, keeping the old one on error.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for an unusable cone, bone or smoothing.
    pub fn reconfigure(&mut self, config: AcquisitionConfig) -> Result<(), ConfigError> {
        config
            .validate()
            .inspect_err(|err| warn!("rejected targeting configuration {config:?}: {err}"))?;
        info!("target acquisition reconfigured: {config:?}");
        self.config = config;
        Ok(())
    }

    /// Picks the alive candidate closest to the viewer's effective aim,
    /// within the targeting cone.
    #[must_use]
    pub fn select_target(&self, entities: &[Entity], viewer: &Viewer) -> Option<Target> {
        let mut best: Option<(usize, AimOffset)> = None;
        for entity in entities {
            if !entity.is_alive() || entity.state.address_base == viewer.state.address_base {
                continue;
            }
            let Some(landmark) = entity.landmark(self.config.bone_index) else {
                continue;
            };

            let offset = aim_offset(viewer.aim_direction, viewer.eye_position, landmark);
            if !offset.angle_size.is_finite() || offset.angle_size > self.config.fov_radians {
                continue;
            }
            // Strict comparison: an equal challenger never displaces the incumbent.
            let closer = best
                .as_ref()
                .map_or(true, |(_, incumbent)| offset.angle_size < incumbent.angle_size);
            if closer {
                best = Some((entity.index, offset));
            }
        }

        best.map(|(entity_index, offset)| Target {
            entity_index,
            angle_size: offset.angle_size,
            steering: offset.angles * (1.0 / self.config.smoothing.max(1.0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;
    use crate::memory::Address;
    use crate::team::Team;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const BONE: usize = DEFAULT_BONE_INDEX;

    #[fixture]
    fn viewer() -> Viewer {
        Viewer {
            state: EntityState {
                address_base: Address(0x1000),
                health: 100,
                team: Team::CounterTerrorists,
                ..EntityState::default()
            },
            aim_direction: Vec3::X,
            ..Viewer::default()
        }
    }

    /// Alive enemy whose landmark sits `yaw_degrees` left of `+X`, 100 units out.
    fn enemy(index: usize, yaw_degrees: f32) -> Entity {
        let yaw = yaw_degrees.to_radians();
        let mut entity = Entity::new(index);
        entity.state = EntityState {
            address_base: Address(0x2000 + 0x100 * u64::try_from(index).unwrap_or(0)),
            health: 100,
            team: Team::Terrorists,
            ..EntityState::default()
        };
        entity.bones = vec![Vec3::ZERO; BONE + 1];
        entity.bones[BONE] = Vec3::new(yaw.cos(), yaw.sin(), 0.0) * 100.0;
        entity
    }

    fn engine(fov_degrees: f32, smoothing: f32) -> TargetAcquisition {
        TargetAcquisition::new(AcquisitionConfig {
            fov_radians: fov_degrees.to_radians(),
            bone_index: BONE,
            smoothing,
        })
        .expect("valid acquisition config")
    }

    #[rstest]
    fn closest_candidate_wins(viewer: Viewer) {
        let entities = [enemy(1, 5.0), enemy(2, 2.0)];
        let target = engine(10.0, 1.0)
            .select_target(&entities, &viewer)
            .expect("a target inside the cone");
        assert_eq!(target.entity_index, 2);
        assert_relative_eq!(target.angle_size, 2_f32.to_radians(), epsilon = 1e-4);
    }

    #[rstest]
    fn nothing_inside_cone_is_not_found(viewer: Viewer) {
        let entities = [enemy(1, 12.0), enemy(2, -30.0)];
        assert!(engine(10.0, 1.0).select_target(&entities, &viewer).is_none());
        assert!(engine(10.0, 1.0).select_target(&[], &viewer).is_none());
    }

    #[rstest]
    fn never_selects_outside_cone(viewer: Viewer) {
        let fov = 7.5_f32;
        for start in 0..20_u8 {
            let entities: Vec<Entity> = (0..10_u8)
                .map(|step| {
                    let yaw = f32::from(start) + f32::from(step) * 3.0 - 20.0;
                    enemy(usize::from(step), yaw)
                })
                .collect();
            if let Some(target) = engine(fov, 1.0).select_target(&entities, &viewer) {
                assert!(target.angle_size <= fov.to_radians());
            }
        }
    }

    #[rstest]
    fn ties_keep_first_seen(viewer: Viewer) {
        let entities = [enemy(4, 3.0), enemy(5, 3.0)];
        let target = engine(10.0, 1.0)
            .select_target(&entities, &viewer)
            .expect("a target inside the cone");
        assert_eq!(target.entity_index, 4);
    }

    #[rstest]
    fn skips_dead_self_and_unresolved_landmarks(viewer: Viewer) {
        let mut dead = enemy(1, 1.0);
        dead.state.life_state = true;
        let mut itself = enemy(2, 1.5);
        itself.state.address_base = viewer.state.address_base;
        let mut boneless = enemy(3, 0.5);
        boneless.bones.clear();
        let entities = [dead, itself, boneless, enemy(4, 6.0)];
        let target = engine(10.0, 1.0)
            .select_target(&entities, &viewer)
            .expect("the only valid candidate");
        assert_eq!(target.entity_index, 4);
    }

    #[rstest]
    fn smoothing_divides_steering(viewer: Viewer) {
        let entities = [enemy(1, 4.0)];
        let raw = engine(10.0, 1.0)
            .select_target(&entities, &viewer)
            .expect("target");
        let damped = engine(10.0, 4.0)
            .select_target(&entities, &viewer)
            .expect("target");
        assert_eq!(damped.steering, raw.steering * 0.25);
        assert_eq!(damped.angle_size, raw.angle_size);
    }

    #[rstest]
    fn smoothing_below_one_never_amplifies(viewer: Viewer) {
        let entities = [enemy(1, 4.0)];
        let raw = engine(10.0, 1.0).select_target(&entities, &viewer);
        let low = engine(10.0, 0.25).select_target(&entities, &viewer);
        assert_eq!(raw, low);
    }

    #[rstest]
    fn steering_points_towards_target(viewer: Viewer) {
        let left = engine(10.0, 1.0)
            .select_target(&[enemy(1, 3.0)], &viewer)
            .expect("target");
        assert!(left.steering.x < 0.0);
        assert_relative_eq!(left.steering.x, -3_f32.to_radians(), epsilon = 1e-4);
        assert_relative_eq!(left.steering.y, 0.0, epsilon = 1e-3);

        let mut below = enemy(2, 0.0);
        below.bones[BONE] = Vec3::new(100.0, 0.0, -5.0);
        let down = engine(10.0, 1.0)
            .select_target(&[below], &viewer)
            .expect("target");
        assert!(down.steering.y > 0.0, "looking down is a positive pitch");
    }

    #[rstest]
    fn reconfigure_rejects_invalid_bone() {
        let mut acquisition = engine(10.0, 3.0);
        let before = *acquisition.config();
        let invalid = AcquisitionConfig {
            bone_index: crate::constants::MAX_STUDIO_BONES,
            ..before
        };
        assert!(acquisition.reconfigure(invalid).is_err());
        assert_eq!(*acquisition.config(), before);
    }

    #[rstest]
    #[case::reference_fov(90, IVec2::new(100, -50))]
    #[case::unset_fov_uses_default(0, IVec2::new(100, -50))]
    #[case::narrow_fov(30, IVec2::new(300, -150))]
    fn pixels_scale_with_fov(#[case] fov: i32, #[case] expected: IVec2) {
        let pixels = steering_pixels(Vec2::new(0.1, -0.05), 0.001, fov);
        assert_eq!(pixels, expected);
    }
}
