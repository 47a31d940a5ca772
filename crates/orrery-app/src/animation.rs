//! Body motion: Earth spin and a circular Moon orbit in the XZ plane.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Vec3};
use orrery_config::SceneConfig;

/// Sphere meshes have their poles on ±Z. This turns +Z into the world up
/// axis (+Y) so textures stand upright and spin happens about the poles.
pub fn pole_up() -> Mat4 {
    Mat4::from_rotation_x(-FRAC_PI_2)
}

#[derive(Debug, Clone)]
pub struct SceneAnimation {
    earth_rotation: f32,
    moon_orbit_angle: f32,
    spin_rate: f32,
    orbit_rate: f32,
    orbit_radius: f32,
    moon_scale: f32,
    skybox_radius: f32,
}

impl SceneAnimation {
    pub fn from_config(scene: &SceneConfig) -> Self {
        Self {
            earth_rotation: 0.0,
            moon_orbit_angle: 0.0,
            spin_rate: scene.earth.spin_rate,
            orbit_rate: scene.moon.orbit_rate,
            orbit_radius: scene.moon.orbit_radius,
            moon_scale: scene.moon.scale,
            skybox_radius: scene.skybox.radius,
        }
    }

    /// Take new rates and sizes from `scene`, keeping the current angles so
    /// the bodies do not jump.
    pub fn retune(&mut self, scene: &SceneConfig) {
        let (earth_rotation, moon_orbit_angle) = (self.earth_rotation, self.moon_orbit_angle);
        *self = Self {
            earth_rotation,
            moon_orbit_angle,
            ..Self::from_config(scene)
        };
    }

    /// Advance both angles by `dt` seconds. Angles stay in `[0, TAU)`.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() {
            return;
        }
        self.earth_rotation = (self.earth_rotation + dt * self.spin_rate).rem_euclid(TAU);
        self.moon_orbit_angle = (self.moon_orbit_angle + dt * self.orbit_rate).rem_euclid(TAU);
    }

    pub fn earth_rotation(&self) -> f32 {
        self.earth_rotation
    }

    pub fn moon_orbit_angle(&self) -> f32 {
        self.moon_orbit_angle
    }

    pub fn moon_position(&self) -> Vec3 {
        let angle = self.moon_orbit_angle;
        Vec3::new(angle.cos(), 0.0, angle.sin()) * self.orbit_radius
    }

    pub fn earth_model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.earth_rotation) * pole_up()
    }

    pub fn moon_model(&self) -> Mat4 {
        Mat4::from_translation(self.moon_position())
            * Mat4::from_scale(Vec3::splat(self.moon_scale))
            * pole_up()
    }

    /// The sky sphere is centered on the camera so it never gets closer.
    pub fn skybox_model(&self, camera_position: Vec3) -> Mat4 {
        Mat4::from_translation(camera_position)
            * Mat4::from_scale(Vec3::splat(self.skybox_radius))
            * pole_up()
    }
}
