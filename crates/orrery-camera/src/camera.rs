//! The camera state machine and its basis derivation.

use glam::{Mat4, Vec3};
use tracing::debug;

use crate::config::{ActivityToggle, CameraConfig, DistanceConstraint};
use crate::error::CameraError;
use crate::intent::MovementIntent;

/// World up axis used to derive the camera basis.
pub const WORLD_UP: Vec3 = Vec3::Y;
/// Initial yaw in degrees; with zero pitch the camera looks down -Z.
pub const DEFAULT_YAW: f32 = -90.0;
/// Initial pitch in degrees (level with the horizon).
pub const DEFAULT_PITCH: f32 = 0.0;
/// Pitch is kept strictly inside the poles so `front` never aligns with
/// [`WORLD_UP`].
pub const PITCH_LIMIT: f32 = 89.0;
/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
/// Near clip plane distance.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance.
pub const FAR_PLANE: f32 = 100.0;
/// World units per unit of `amount * zoom_speed`.
const ZOOM_STEP: f32 = 0.1;

/// Whether the camera responds to movement and rotation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Movement, rotation and zoom are applied.
    Active,
    /// Input is ignored; the pose is kept as it is.
    Inactive,
}

/// Free-look camera with optional orbit shell and activity gate.
///
/// The orientation is stored as yaw/pitch in degrees. `front`, `right` and
/// `up` are rebuilt from those two angles and [`WORLD_UP`] after every
/// change, never rotated incrementally.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    mode: CameraMode,
    config: CameraConfig,
    home: Vec3,
}

impl Camera {
    /// A camera with default tuning at `position`, looking down -Z.
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            mode: CameraMode::Active,
            config: CameraConfig::default(),
            home: position,
        };
        camera.update_vectors();
        camera
    }

    /// A camera with explicit tuning. A start position outside a distance
    /// shell is clamped onto it, and that clamped position is what
    /// [`reset`](Self::reset) returns to.
    pub fn with_config(position: Vec3, config: CameraConfig) -> Result<Self, CameraError> {
        config.validate()?;
        let mut camera = Self::new(position);
        camera.config = config;
        camera.apply_constraint();
        camera.home = camera.position;
        Ok(camera)
    }

    /// Right-handed view matrix looking along [`front`](Self::front).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for a `width x height` viewport.
    pub fn projection_matrix(&self, width: f32, height: f32) -> Result<Mat4, CameraError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CameraError::InvalidViewport { width, height });
        }
        Ok(Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            width / height,
            NEAR_PLANE,
            FAR_PLANE,
        ))
    }

    /// `projection * view` for the given viewport.
    pub fn view_projection(&self, width: f32, height: f32) -> Result<Mat4, CameraError> {
        Ok(self.projection_matrix(width, height)? * self.view_matrix())
    }

    /// Move along the requested axes for `elapsed_seconds`. Forward/back and
    /// left/right follow the view; up/down follow [`WORLD_UP`].
    pub fn advance(&mut self, elapsed_seconds: f32, intent: MovementIntent) {
        if !self.is_active() || intent.is_empty() || !elapsed_seconds.is_finite() {
            return;
        }

        let mut direction = Vec3::ZERO;
        if intent.contains(MovementIntent::FORWARD) {
            direction += self.front;
        }
        if intent.contains(MovementIntent::BACKWARD) {
            direction -= self.front;
        }
        if intent.contains(MovementIntent::RIGHT) {
            direction += self.right;
        }
        if intent.contains(MovementIntent::LEFT) {
            direction -= self.right;
        }
        if intent.contains(MovementIntent::UP) {
            direction += WORLD_UP;
        }
        if intent.contains(MovementIntent::DOWN) {
            direction -= WORLD_UP;
        }

        self.position += direction * self.config.speed * elapsed_seconds;
        self.apply_constraint();
    }

    /// Turn by a raw pointer delta. Horizontal motion adds to yaw; vertical
    /// motion changes pitch according to the configured convention.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        if !self.is_active() || !delta_x.is_finite() || !delta_y.is_finite() {
            return;
        }
        let sensitivity = self.config.sensitivity;
        self.yaw = wrap_degrees(self.yaw + delta_x * sensitivity);
        self.pitch += self.config.pitch_convention.apply(delta_y * sensitivity);
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Dolly along the view direction. Positive amounts move forward.
    pub fn zoom(&mut self, amount: f32) {
        if !self.is_active() || !amount.is_finite() {
            return;
        }
        self.position += self.front * amount * self.config.zoom_speed * ZOOM_STEP;
        self.apply_constraint();
    }

    /// Flip the activity flag and return the new mode. Pose is untouched.
    pub fn toggle_active(&mut self) -> CameraMode {
        let active = !self.is_active();
        self.set_active(active)
    }

    /// Force the activity flag. An always-on camera stays active.
    pub fn set_active(&mut self, active: bool) -> CameraMode {
        let mode = if active || self.config.activity_toggle == ActivityToggle::AlwaysOn {
            CameraMode::Active
        } else {
            CameraMode::Inactive
        };
        if mode != self.mode {
            debug!(?mode, "camera mode changed");
        }
        self.mode = mode;
        mode
    }

    /// Return to the starting position looking down -Z. The activity flag is
    /// left as it is.
    pub fn reset(&mut self) {
        self.position = self.home;
        self.yaw = DEFAULT_YAW;
        self.pitch = DEFAULT_PITCH;
        self.update_vectors();
    }

    /// Teleport, then clamp onto the distance shell if one is configured.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.apply_constraint();
    }

    /// Swap in new tuning without touching the orientation. The position and
    /// the reset target are clamped onto a new shell; an always-on camera is
    /// reactivated. Returns the resulting mode.
    pub fn set_config(&mut self, config: CameraConfig) -> Result<CameraMode, CameraError> {
        config.validate()?;
        self.config = config;
        self.position = self.constrained(self.position);
        self.home = self.constrained(self.home);
        Ok(self.set_active(self.is_active()))
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Horizontal look angle in degrees. Wrapped to `[0, 360)` once the
    /// camera has turned.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Vertical look angle in degrees, within ±[`PITCH_LIMIT`].
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit vector to the right of the view, perpendicular to [`WORLD_UP`].
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit camera up vector.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Current activity state.
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Whether input is currently applied.
    pub fn is_active(&self) -> bool {
        self.mode == CameraMode::Active
    }

    /// Tuning and variant selection in use.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    fn apply_constraint(&mut self) {
        self.position = self.constrained(self.position);
    }

    fn constrained(&self, position: Vec3) -> Vec3 {
        let DistanceConstraint::Shell { min, max } = self.config.distance_constraint else {
            return position;
        };
        let distance = position.length();
        if distance < min {
            if distance <= f32::EPSILON {
                // No direction to push along; step back from the view.
                -self.front * min
            } else {
                position * (min / distance)
            }
        } else if distance > max {
            position * (max / distance)
        } else {
            position
        }
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PitchConvention;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    /// Deterministic pseudo-random deltas in [-range, range].
    fn deltas(seed: u32, count: usize, range: f32) -> Vec<(f32, f32)> {
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
        };
        (0..count).map(|_| (next() * range, next() * range)).collect()
    }

    fn shell_camera(position: Vec3, min: f32, max: f32) -> Camera {
        Camera::with_config(
            position,
            CameraConfig {
                distance_constraint: DistanceConstraint::Shell { min, max },
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        assert!(approx(camera.front(), Vec3::NEG_Z));
        assert!(approx(camera.right(), Vec3::X));
        assert!(approx(camera.up(), Vec3::Y));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.mode(), CameraMode::Active);
    }

    #[test]
    fn test_advance_forward_one_second() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        camera.advance(1.0, MovementIntent::FORWARD);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 8.5)));
    }

    #[test]
    fn test_advance_sums_axes() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.advance(2.0, MovementIntent::RIGHT | MovementIntent::UP);
        assert!(approx(camera.position(), Vec3::new(3.0, 3.0, 0.0)));

        camera.advance(1.0, MovementIntent::FORWARD | MovementIntent::BACKWARD);
        assert!(approx(camera.position(), Vec3::new(3.0, 3.0, 0.0)));
    }

    #[test]
    fn test_vertical_motion_ignores_pitch() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(0.0, -200.0);
        assert!(camera.pitch() > 30.0);
        camera.advance(1.0, MovementIntent::DOWN);
        assert!(approx(camera.position(), Vec3::new(0.0, -1.5, 0.0)));
    }

    #[test]
    fn test_basis_stays_orthonormal() {
        let mut camera = Camera::new(Vec3::ZERO);
        for (dx, dy) in deltas(7, 500, 400.0) {
            camera.rotate(dx, dy);
            let (f, r, u) = (camera.front(), camera.right(), camera.up());
            assert!((f.length() - 1.0).abs() < EPS);
            assert!((r.length() - 1.0).abs() < EPS);
            assert!((u.length() - 1.0).abs() < EPS);
            assert!(f.dot(r).abs() < EPS);
            assert!(f.dot(u).abs() < EPS);
            assert!(r.dot(u).abs() < EPS);
            assert!(r.cross(u).dot(-f) > 1.0 - 1e-4, "basis is not right-handed");
        }
    }

    #[test]
    fn test_pitch_never_leaves_limits() {
        let mut camera = Camera::new(Vec3::ZERO);
        for _ in 0..50 {
            camera.rotate(0.0, -1.0e6);
            assert!(camera.pitch() <= PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        for _ in 0..50 {
            camera.rotate(0.0, 1.0e6);
            assert!(camera.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn test_natural_pitch_looks_up_when_pointer_moves_up() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(0.0, -10.0);
        assert!((camera.pitch() - 2.0).abs() < EPS);
        assert!(camera.front().y > 0.0);
    }

    #[test]
    fn test_inverted_pitch() {
        let mut camera = Camera::with_config(
            Vec3::ZERO,
            CameraConfig {
                pitch_convention: PitchConvention::Inverted,
                ..Default::default()
            },
        )
        .unwrap();
        camera.rotate(0.0, -10.0);
        assert!((camera.pitch() + 2.0).abs() < EPS);
        assert!(camera.front().y < 0.0);
    }

    #[test]
    fn test_yaw_follows_horizontal_delta() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(450.0, 0.0);
        assert!((camera.yaw() - 0.0).abs() < 1e-4);
        assert!(approx(camera.front(), Vec3::X));
    }

    #[test]
    fn test_yaw_keeps_precision_after_many_turns() {
        let mut camera = Camera::new(Vec3::ZERO);
        for _ in 0..1000 {
            camera.rotate(1.0e7, 0.0);
            assert!((0.0..360.0).contains(&camera.yaw()));
        }
        let before = camera.yaw();
        camera.rotate(1.0, 0.0);
        let turned = (camera.yaw() - before).rem_euclid(360.0);
        assert!((turned - 0.2).abs() < 1e-3, "turned {turned}");
        assert!((0.0..360.0).contains(&camera.yaw()));
    }

    #[test]
    fn test_negative_yaw_wraps_into_range() {
        let mut camera = Camera::new(Vec3::ZERO);
        // -90 - 90 = -180 -> 180
        camera.rotate(-450.0, 0.0);
        assert!((camera.yaw() - 180.0).abs() < 1e-4);
        assert!(approx(camera.front(), Vec3::NEG_X));
    }

    #[test]
    fn test_set_config_clamps_onto_new_shell() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let mode = camera
            .set_config(CameraConfig {
                distance_constraint: DistanceConstraint::Shell { min: 1.0, max: 4.0 },
                ..Default::default()
            })
            .unwrap();
        assert_eq!(mode, CameraMode::Active);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 4.0)));
        camera.set_position(Vec3::new(0.0, 0.0, 2.0));
        camera.reset();
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 4.0)));
    }

    #[test]
    fn test_set_config_rejects_invalid_and_keeps_old() {
        let mut camera = Camera::new(Vec3::ZERO);
        let result = camera.set_config(CameraConfig {
            speed: f32::INFINITY,
            ..Default::default()
        });
        assert!(matches!(result, Err(CameraError::InvalidRate { name: "speed", .. })));
        assert_eq!(camera.config(), &CameraConfig::default());
    }

    #[test]
    fn test_set_config_always_on_reactivates() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.toggle_active();
        let mode = camera
            .set_config(CameraConfig {
                activity_toggle: ActivityToggle::AlwaysOn,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(mode, CameraMode::Active);
        assert!(camera.is_active());
    }

    #[test]
    fn test_inactive_camera_ignores_input() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.toggle_active(), CameraMode::Inactive);

        let before = (camera.position(), camera.yaw(), camera.pitch());
        for (dx, dy) in deltas(3, 20, 100.0) {
            camera.rotate(dx, dy);
            camera.advance(0.5, MovementIntent::FORWARD | MovementIntent::LEFT);
            camera.zoom(3.0);
        }
        assert_eq!((camera.position(), camera.yaw(), camera.pitch()), before);

        assert_eq!(camera.toggle_active(), CameraMode::Active);
        camera.advance(1.0, MovementIntent::FORWARD);
        assert_ne!(camera.position(), before.0);
    }

    #[test]
    fn test_toggle_keeps_pose() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        camera.rotate(30.0, 15.0);
        let pose = (camera.position(), camera.yaw(), camera.pitch());
        camera.toggle_active();
        camera.toggle_active();
        assert_eq!((camera.position(), camera.yaw(), camera.pitch()), pose);
    }

    #[test]
    fn test_always_on_ignores_toggle() {
        let mut camera = Camera::with_config(
            Vec3::ZERO,
            CameraConfig {
                activity_toggle: ActivityToggle::AlwaysOn,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(camera.toggle_active(), CameraMode::Active);
        assert_eq!(camera.set_active(false), CameraMode::Active);
        assert!(camera.is_active());
    }

    #[test]
    fn test_shell_holds_under_arbitrary_motion() {
        let (min, max) = (2.0, 20.0);
        let mut camera = shell_camera(Vec3::new(0.0, 0.0, 10.0), min, max);
        let intents = [
            MovementIntent::FORWARD,
            MovementIntent::BACKWARD | MovementIntent::UP,
            MovementIntent::LEFT,
            MovementIntent::RIGHT | MovementIntent::DOWN,
            MovementIntent::FORWARD | MovementIntent::LEFT | MovementIntent::UP,
        ];
        for (step, (dx, dy)) in deltas(11, 400, 200.0).into_iter().enumerate() {
            camera.rotate(dx, dy);
            camera.advance(
                (step % 7) as f32 * 0.8,
                intents[step % intents.len()],
            );
            let distance = camera.position().length();
            assert!(
                distance >= min - 1e-4 && distance <= max + 1e-4,
                "distance {distance} left shell at step {step}"
            );
        }
    }

    #[test]
    fn test_shell_clamps_to_nearest_bound() {
        let mut camera = shell_camera(Vec3::new(0.0, 0.0, 10.0), 5.0, 12.0);
        camera.advance(10.0, MovementIntent::BACKWARD);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 12.0)));

        camera.advance(2.0, MovementIntent::FORWARD);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 9.0)));

        camera.advance(3.0, MovementIntent::FORWARD);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_shell_at_origin_steps_back() {
        let camera = shell_camera(Vec3::ZERO, 3.0, 10.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn test_start_outside_shell_is_clamped() {
        let mut camera = shell_camera(Vec3::new(0.0, 40.0, 0.0), 1.0, 10.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 10.0, 0.0)));
        camera.set_position(Vec3::new(0.0, 0.0, 0.5));
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 1.0)));
        camera.reset();
        assert!(approx(camera.position(), Vec3::new(0.0, 10.0, 0.0)));
    }

    #[test]
    fn test_zoom_dollies_along_front() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        camera.zoom(2.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 9.0)));
        camera.zoom(-4.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 11.0)));
    }

    #[test]
    fn test_reset_restores_pose_not_mode() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        camera.rotate(120.0, -80.0);
        camera.advance(3.0, MovementIntent::LEFT | MovementIntent::UP);
        camera.toggle_active();
        camera.reset();
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 10.0)));
        assert_eq!(camera.yaw(), DEFAULT_YAW);
        assert_eq!(camera.pitch(), DEFAULT_PITCH);
        assert!(approx(camera.front(), Vec3::NEG_Z));
        assert_eq!(camera.mode(), CameraMode::Inactive);
    }

    #[test]
    fn test_view_matrix_puts_front_on_negative_z() {
        let mut camera = Camera::new(Vec3::new(4.0, -2.0, 7.0));
        camera.rotate(57.0, 33.0);
        let view = camera.view_matrix();
        let eye = view.transform_point3(camera.position());
        assert!(eye.length() < 1e-4);
        let ahead = view.transform_point3(camera.position() + camera.front());
        assert!(approx(ahead, Vec3::NEG_Z));
    }

    #[test]
    fn test_projection_uses_45_degree_fov() {
        let camera = Camera::new(Vec3::ZERO);
        let proj = camera.projection_matrix(1.0, 1.0).unwrap();
        let expected = 1.0 / (FOV_Y_DEGREES.to_radians() / 2.0).tan();
        assert!((proj.y_axis.y - expected).abs() < 1e-4);

        let wide = camera.projection_matrix(1920.0, 1080.0).unwrap();
        assert!((wide.x_axis.x * 1920.0 / 1080.0 - wide.y_axis.y).abs() < 1e-4);
    }

    #[test]
    fn test_projection_depth_range() {
        let camera = Camera::new(Vec3::ZERO);
        let proj = camera.projection_matrix(16.0, 9.0).unwrap();
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -NEAR_PLANE));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -FAR_PLANE));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_rejects_degenerate_viewport() {
        let camera = Camera::new(Vec3::ZERO);
        assert!(matches!(
            camera.projection_matrix(800.0, 0.0),
            Err(CameraError::InvalidViewport { .. })
        ));
        assert!(camera.projection_matrix(0.0, 600.0).is_err());
        assert!(camera.projection_matrix(-800.0, 600.0).is_err());
        assert!(camera.projection_matrix(f32::NAN, 600.0).is_err());
        assert!(camera.view_projection(800.0, 0.0).is_err());
    }

    #[test]
    fn test_with_config_rejects_inverted_shell() {
        let result = Camera::with_config(
            Vec3::ZERO,
            CameraConfig {
                distance_constraint: DistanceConstraint::Shell { min: 9.0, max: 1.0 },
                ..Default::default()
            },
        );
        assert_eq!(
            result.err(),
            Some(CameraError::InvalidShell { min: 9.0, max: 1.0 })
        );
    }
}
