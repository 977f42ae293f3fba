//! World to screen transforms.
//!
//! The camera supplies a world-to-clip matrix every cycle. The
//! clip-to-viewport matrix depends only on the output surface and is
//! rebuilt when the surface size changes. Both are combined into a single
//! world-to-screen matrix that every consumer shares read-only until the
//! next viewer update.

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the output surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Builds a size from width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Maps normalised device coordinates onto pixels.
///
/// `x = -1` lands on the left edge, `y = 1` on the top edge, depth passes
/// through unchanged.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use sightline::transform::{viewport_matrix, SurfaceSize};
/// let viewport = viewport_matrix(SurfaceSize::new(800, 600));
/// let top_left = viewport.transform_point3(Vec3::new(-1.0, 1.0, 0.5));
/// assert_eq!(top_left, Vec3::new(0.0, 0.0, 0.5));
/// ```
#[expect(
    clippy::cast_precision_loss,
    reason = "Surface dimensions are far below f32's exact integer range."
)]
#[must_use]
pub fn viewport_matrix(size: SurfaceSize) -> Mat4 {
    let half_width = size.width as f32 * 0.5;
    let half_height = size.height as f32 * 0.5;
    Mat4::from_cols(
        Vec4::new(half_width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -half_height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(half_width, half_height, 0.0, 1.0),
    )
}

/// The three camera matrices of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    world_to_clip: Mat4,
    clip_to_viewport: Mat4,
    world_to_screen: Mat4,
    surface: SurfaceSize,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            world_to_clip: Mat4::IDENTITY,
            clip_to_viewport: viewport_matrix(SurfaceSize::default()),
            world_to_screen: viewport_matrix(SurfaceSize::default()),
            surface: SurfaceSize::default(),
        }
    }
}

impl CameraTransform {
    /// Builds the transform for a camera matrix and surface.
    #[must_use]
    pub fn new(world_to_clip: Mat4, surface: SurfaceSize) -> Self {
        let clip_to_viewport = viewport_matrix(surface);
        Self {
            world_to_clip,
            clip_to_viewport,
            world_to_screen: clip_to_viewport * world_to_clip,
            surface,
        }
    }

    /// Replaces the camera matrix, rebuilding the viewport only when the
    /// surface size changed.
    pub fn update(&mut self, world_to_clip: Mat4, surface: SurfaceSize) {
        if surface != self.surface {
            self.clip_to_viewport = viewport_matrix(surface);
            self.surface = surface;
        }
        self.world_to_clip = world_to_clip;
        self.world_to_screen = self.clip_to_viewport * world_to_clip;
    }

    /// World-to-clip matrix.
    #[must_use]
    pub const fn world_to_clip(&self) -> Mat4 {
        self.world_to_clip
    }

    /// Clip-to-viewport matrix.
    #[must_use]
    pub const fn clip_to_viewport(&self) -> Mat4 {
        self.clip_to_viewport
    }

    /// Composite world-to-screen matrix.
    #[must_use]
    pub const fn world_to_screen_matrix(&self) -> Mat4 {
        self.world_to_screen
    }

    /// Surface the viewport was built for.
    #[must_use]
    pub const fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Projects a world point to screen pixels plus depth.
    ///
    /// Points on or behind the camera plane produce non-finite or mirrored
    /// coordinates; use [`Self::project_visible`] when that matters.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec3) -> Vec3 {
        self.world_to_screen.project_point3(point)
    }

    /// Projects a world point, returning `None` when it sits behind the
    /// camera.
    #[must_use]
    pub fn project_visible(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.world_to_clip * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let screen = self.world_to_screen(point);
        screen.is_finite().then_some(screen.truncate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    /// Camera at the origin looking down `+X` with `w = x`.
    #[fixture]
    fn forward_camera() -> Mat4 {
        Mat4::from_cols(
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(-1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 0.0),
        )
    }

    #[rstest]
    fn centre_of_view_lands_mid_surface(forward_camera: Mat4) {
        let camera = CameraTransform::new(forward_camera, SurfaceSize::new(1920, 1080));
        let screen = camera.world_to_screen(Vec3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(screen.x, 960.0);
        assert_relative_eq!(screen.y, 540.0);
    }

    #[rstest]
    fn points_right_and_up_map_right_and_up(forward_camera: Mat4) {
        let camera = CameraTransform::new(forward_camera, SurfaceSize::new(200, 100));
        // Right of the view is -Y in world space.
        let screen = camera.world_to_screen(Vec3::new(10.0, -5.0, 5.0));
        assert_relative_eq!(screen.x, 150.0);
        assert_relative_eq!(screen.y, 25.0);
    }

    #[rstest]
    fn behind_camera_is_not_visible(forward_camera: Mat4) {
        let camera = CameraTransform::new(forward_camera, SurfaceSize::new(200, 100));
        assert!(camera.project_visible(Vec3::new(-10.0, 0.0, 0.0)).is_none());
        assert!(camera.project_visible(Vec3::new(10.0, 0.0, 0.0)).is_some());
    }

    #[rstest]
    fn update_rebuilds_viewport_on_resize(forward_camera: Mat4) {
        let mut camera = CameraTransform::new(forward_camera, SurfaceSize::new(200, 100));
        camera.update(forward_camera, SurfaceSize::new(400, 300));
        assert_eq!(camera.surface(), SurfaceSize::new(400, 300));
        assert_eq!(
            camera.clip_to_viewport(),
            viewport_matrix(SurfaceSize::new(400, 300))
        );
        assert_eq!(
            camera.world_to_screen_matrix(),
            camera.clip_to_viewport() * camera.world_to_clip()
        );
    }
}
