//! Screen-space markers for an overlay.

use glam::Vec2;

use crate::snapshot::GameSnapshot;
use crate::team::Team;

/// One alive entity projected onto the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMarker {
    /// Entity-list slot.
    pub entity_index: usize,
    /// Side the entity plays on.
    pub team: Team,
    /// Remaining health.
    pub health: i32,
    /// Projected model origin in pixels.
    pub origin: Vec2,
    /// Projected skeletal landmark, when resolved and in front of the camera.
    pub landmark: Option<Vec2>,
}

/// Projects every alive entity of `snapshot` whose origin is in front of
/// the viewer's camera.
#[must_use]
pub fn screen_markers(snapshot: &GameSnapshot, bone_index: usize) -> Vec<ScreenMarker> {
    let camera = &snapshot.viewer.camera;
    snapshot
        .entities
        .iter()
        .filter(|entity| entity.is_alive())
        .filter_map(|entity| {
            let origin = camera.project_visible(entity.state.origin)?;
            Some(ScreenMarker {
                entity_index: entity.index,
                team: entity.state.team,
                health: entity.state.health,
                origin,
                landmark: entity
                    .landmark(bone_index)
                    .and_then(|point| camera.project_visible(point)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityState, Viewer};
    use crate::memory::Address;
    use crate::transform::{CameraTransform, SurfaceSize};
    use approx::assert_relative_eq;
    use glam::{Mat4, Vec3, Vec4};
    use rstest::rstest;

    fn snapshot_with(entities: Vec<Entity>) -> GameSnapshot {
        let forward = Mat4::from_cols(
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(-1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 0.0),
        );
        GameSnapshot {
            frame: 1,
            viewer: Viewer {
                camera: CameraTransform::new(forward, SurfaceSize::new(200, 100)),
                ..Viewer::default()
            },
            entities,
        }
    }

    fn alive_at(index: usize, origin: Vec3) -> Entity {
        let mut entity = Entity::new(index);
        entity.state = EntityState {
            address_base: Address(0x4000),
            health: 42,
            team: Team::Terrorists,
            origin,
            ..EntityState::default()
        };
        entity
    }

    #[rstest]
    fn projects_origin_and_landmark() {
        let mut entity = alive_at(5, Vec3::new(10.0, 0.0, 0.0));
        entity.bones = vec![Vec3::new(10.0, -5.0, 5.0)];
        let markers = screen_markers(&snapshot_with(vec![entity]), 0);
        let [marker] = markers.as_slice() else {
            panic!("expected one marker, got {markers:?}");
        };
        assert_eq!(marker.entity_index, 5);
        assert_eq!(marker.health, 42);
        assert_relative_eq!(marker.origin.x, 100.0);
        assert_relative_eq!(marker.origin.y, 50.0);
        let landmark = marker.landmark.expect("landmark in view");
        assert_relative_eq!(landmark.x, 150.0);
        assert_relative_eq!(landmark.y, 25.0);
    }

    #[rstest]
    fn skips_dead_and_behind_camera() {
        let mut dead = alive_at(1, Vec3::new(10.0, 0.0, 0.0));
        dead.state.health = 0;
        let behind = alive_at(2, Vec3::new(-10.0, 0.0, 0.0));
        let unresolved = alive_at(3, Vec3::new(20.0, 0.0, 0.0));
        let markers = screen_markers(&snapshot_with(vec![dead, behind, unresolved]), 8);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.first().map(|m| m.entity_index), Some(3));
        assert_eq!(markers.first().and_then(|m| m.landmark), None);
    }
}
