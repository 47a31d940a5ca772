//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Everything the
//! viewer needs lives in it; there is no global state.

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;
use orrery_camera::{Camera, CameraMode};
use orrery_config::Config;
use orrery_input::{Action, KeyBindings, KeyboardState, MouseState, movement_intent};
use orrery_render::{
    DrawStyle, RenderContext, RenderOptions, SurfaceError, SurfaceWrapper,
    init_render_context_blocking,
};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::animation::SceneAnimation;
use crate::clock::FrameClock;
use crate::error::AppError;
use crate::scene::SceneRenderer;

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attributes = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attributes
    }
}

pub struct AppState {
    config: Config,
    /// Where `config.ron` is re-read from on the reload command.
    config_dir: PathBuf,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    scene: Option<SceneRenderer>,
    surface: SurfaceWrapper,
    camera: Camera,
    animation: SceneAnimation,
    clock: FrameClock,
    keyboard: KeyboardState,
    mouse: MouseState,
    bindings: KeyBindings,
    focused: bool,
    wireframe: bool,
    /// First error that stopped the event loop.
    fatal: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config, config_dir: PathBuf) -> Result<Self, AppError> {
        let camera = Camera::with_config(
            Vec3::from_array(config.scene.camera_start),
            config.camera.clone(),
        )?;
        let bindings = KeyBindings::from_overrides(&config.input.keybindings);
        let animation = SceneAnimation::from_config(&config.scene);

        Ok(Self {
            surface: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            wireframe: config.debug.wireframe_mode,
            config,
            config_dir,
            window: None,
            gpu: None,
            scene: None,
            camera,
            animation,
            clock: FrameClock::new(),
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            bindings,
            focused: true,
            fatal: None,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn animation(&self) -> &SceneAnimation {
        &self.animation
    }

    /// The error that ended the run, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.fatal.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let inner = window.inner_size();
        self.surface = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());

        let gpu = init_render_context_blocking(
            window.clone(),
            RenderOptions {
                vsync: self.config.window.vsync,
            },
        )?;
        let size = self.surface.physical_size();
        let scene = SceneRenderer::new(&gpu, &self.config, size.width, size.height)?;
        if self.wireframe && !scene.supports_wireframe() {
            warn!("Wireframe requested but not supported by this adapter");
            self.wireframe = false;
        }

        self.mouse.set_captured(&window, self.camera.is_active());
        window.request_redraw();
        info!(
            "Window created: {}x{} (scale: {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.scene = Some(scene);
        self.clock.restart();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(scene) = &mut self.scene {
                scene.resize(&gpu.device, width, height);
            }
        }
    }

    fn set_camera_active(&mut self, mode: CameraMode) {
        if let Some(window) = &self.window {
            self.mouse.set_captured(window, mode == CameraMode::Active);
        }
        info!("Camera {:?}", mode);
    }

    /// Re-read `config.ron` and apply whatever changed.
    fn reload_config(&mut self) {
        match self.config.reload(&self.config_dir) {
            Ok(Some(config)) => {
                let before = self.camera.mode();
                match self.apply_config(config) {
                    Ok(mode) if mode != before => self.set_camera_active(mode),
                    Ok(_) => {}
                    Err(e) => warn!("Rejected reloaded config: {e}"),
                }
            }
            Ok(None) => info!("Config unchanged"),
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }

    /// Apply a new config to the running viewer. Camera tuning, key bindings
    /// and animation rates change immediately; window, render and mesh
    /// settings wait for the next start. Nothing changes if validation fails.
    fn apply_config(&mut self, config: Config) -> Result<CameraMode, AppError> {
        config.validate()?;
        let mode = self.camera.set_config(config.camera.clone())?;
        if needs_restart(&self.config, &config) {
            info!("Window, render and mesh settings apply on next start");
        }
        self.bindings = KeyBindings::from_overrides(&config.input.keybindings);
        self.animation.retune(&config.scene);
        self.config = config;
        info!("Config reloaded");
        Ok(mode)
    }

    fn handle_commands(&mut self, event_loop: &ActiveEventLoop) {
        let pressed = |action| self.bindings.just_pressed(&self.keyboard, action);
        let quit = pressed(Action::Quit);
        let fullscreen = pressed(Action::Fullscreen);
        let wireframe = pressed(Action::Wireframe);
        let reset = pressed(Action::ResetCamera);
        let toggle_camera = pressed(Action::ToggleCamera);
        let reload = pressed(Action::ReloadConfig);

        if quit {
            info!("Quit requested");
            event_loop.exit();
            return;
        }
        if fullscreen && let Some(window) = &self.window {
            let next = match window.fullscreen() {
                Some(_) => None,
                None => Some(Fullscreen::Borderless(None)),
            };
            info!("Fullscreen {}", if next.is_some() { "on" } else { "off" });
            window.set_fullscreen(next);
        }
        if wireframe {
            if self.scene.as_ref().is_some_and(SceneRenderer::supports_wireframe) {
                self.wireframe = !self.wireframe;
                info!("Wireframe {}", if self.wireframe { "on" } else { "off" });
            } else {
                warn!("Wireframe not supported by this adapter");
            }
        }
        if reset {
            self.camera.reset();
            info!("Camera reset");
        }
        if reload {
            self.reload_config();
        }
        if toggle_camera {
            let mode = self.camera.toggle_active();
            self.set_camera_active(mode);
        }
    }

    /// Input, camera and animation for one frame. Skipped while unfocused.
    fn update(&mut self, event_loop: &ActiveEventLoop, dt: f32) {
        self.handle_commands(event_loop);

        let intent = movement_intent(&self.keyboard, &self.bindings);
        self.camera.advance(dt, intent);

        if self.camera.is_active() {
            let delta = self.mouse.delta();
            if delta != glam::Vec2::ZERO {
                self.camera.rotate(delta.x, delta.y);
            }
        }

        let scroll = self.mouse.scroll();
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }

        self.animation.tick(dt);
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        if !self.surface.is_renderable() {
            return;
        }
        let (Some(gpu), Some(scene)) = (&self.gpu, &self.scene) else {
            return;
        };
        let size = self.surface.physical_size();
        let projection = match self
            .camera
            .projection_matrix(size.width as f32, size.height as f32)
        {
            Ok(projection) => projection,
            Err(e) => {
                warn!("Skipping frame: {e}");
                return;
            }
        };
        let style = if self.wireframe {
            DrawStyle::Wireframe
        } else {
            DrawStyle::Opaque
        };

        let result = scene.render(
            gpu,
            self.camera.view_matrix(),
            projection,
            self.camera.position(),
            &self.animation,
            style,
        );
        match result {
            Ok(()) => {}
            Err(SurfaceError::Lost) => self.resize(size.width, size.height),
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
        }
    }
}

/// Settings that are baked into the window, the pipelines or the uploaded
/// meshes and cannot change while running.
fn needs_restart(old: &Config, new: &Config) -> bool {
    let geometry = |c: &Config| {
        let scene = &c.scene;
        (
            (scene.earth.sphere(), scene.earth.texture.clone()),
            (scene.moon.sphere(), scene.moon.texture.clone()),
            (
                scene.skybox.enabled,
                scene.skybox.sphere(),
                scene.skybox.texture.clone(),
            ),
        )
    };
    old.window != new.window || old.render != new.render || geometry(old) != geometry(new)
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(size) = self.surface.handle_resize(new_size.width, new_size.height) {
                    self.resize(size.width, size.height);
                    info!(
                        "Window resized to {}x{} (scale: {:.2})",
                        size.width,
                        size.height,
                        self.surface.scale_factor()
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    if let Some(size) = self.surface.handle_scale_factor_changed(
                        scale_factor,
                        inner.width,
                        inner.height,
                    ) {
                        self.resize(size.width, size.height);
                        info!(
                            "Scale factor changed to {:.2}, resized to {}x{}",
                            scale_factor, size.width, size.height
                        );
                    }
                }
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if focused {
                    self.clock.restart();
                    if let Some(window) = &self.window {
                        self.mouse.set_captured(window, self.camera.is_active());
                    }
                } else {
                    self.keyboard.release_all();
                    if let Some(window) = &self.window {
                        self.mouse.set_captured(window, false);
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::CursorEntered { .. } => {
                self.mouse.on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick();
                if self.focused {
                    self.update(event_loop, dt);
                }
                self.render(event_loop);

                self.keyboard.clear_transients();
                self.mouse.clear_transients();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = &mut self.scene {
            let released = scene.release();
            info!("Released {released} GPU meshes");
        }
    }
}

/// Create the event loop and run the viewer until the window closes.
/// `config_dir` is where the reload command looks for `config.ron`.
#[instrument(skip(config))]
pub fn run_with_config(config: Config, config_dir: PathBuf) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, config_dir)?;
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_camera::DistanceConstraint;

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Test".to_string();
        let attributes = window_attributes_from_config(&config);
        assert_eq!(attributes.title, "Test");
    }

    #[test]
    fn test_app_state_starts_at_configured_position() {
        let mut config = Config::default();
        config.scene.camera_start = [0.0, 1.0, 6.0];
        let app = AppState::new(config, PathBuf::new()).expect("valid config");
        assert_eq!(app.camera().position(), Vec3::new(0.0, 1.0, 6.0));
        assert!(app.camera().is_active());
        assert_eq!(app.animation().earth_rotation(), 0.0);
    }

    #[test]
    fn test_app_state_rejects_bad_camera() {
        let mut config = Config::default();
        config.camera.sensitivity = f32::NAN;
        assert!(matches!(AppState::new(config, PathBuf::new()), Err(AppError::Camera(_))));
    }

    #[test]
    fn test_apply_config_updates_camera_bindings_and_animation() {
        let mut app = AppState::new(Config::default(), PathBuf::new()).expect("valid config");
        let mut config = Config::default();
        config.camera.distance_constraint = DistanceConstraint::Shell { min: 2.0, max: 6.0 };
        config
            .input
            .keybindings
            .insert("reload_config".to_string(), "F6".to_string());
        config.scene.moon.orbit_radius = 4.0;

        assert!(matches!(app.apply_config(config), Ok(CameraMode::Active)));
        assert!((app.camera().position().length() - 6.0).abs() < 1e-4);
        assert_eq!(
            app.bindings.key(Action::ReloadConfig),
            winit::keyboard::KeyCode::F6
        );
        assert!((app.animation().moon_position().length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_apply_config_rejects_invalid_without_changes() {
        let mut app = AppState::new(Config::default(), PathBuf::new()).expect("valid config");
        let mut config = Config::default();
        config.camera.speed = 9.0;
        config.scene.earth.stacks = 1;

        assert!(matches!(app.apply_config(config), Err(AppError::Config(_))));
        assert_eq!(app.camera().config(), &Config::default().camera);
        assert_eq!(app.config, Config::default());
    }

    #[test]
    fn test_reload_reads_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut on_disk = Config::default();
        on_disk.camera.speed = 4.0;
        on_disk.save(dir.path()).unwrap();

        let mut app =
            AppState::new(Config::default(), dir.path().to_path_buf()).expect("valid config");
        app.reload_config();
        assert_eq!(app.camera().config().speed, 4.0);
        assert_eq!(app.config, on_disk);
    }

    #[test]
    fn test_reload_with_missing_file_keeps_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut app =
            AppState::new(Config::default(), dir.path().to_path_buf()).expect("valid config");
        app.reload_config();
        assert_eq!(app.config, Config::default());
    }

    #[test]
    fn test_needs_restart() {
        let old = Config::default();

        let mut camera_only = old.clone();
        camera_only.camera.speed = 3.0;
        camera_only.scene.earth.spin_rate = 1.0;
        assert!(!needs_restart(&old, &camera_only));

        let mut mesh = old.clone();
        mesh.scene.earth.sectors = 64;
        assert!(needs_restart(&old, &mesh));

        let mut window = old.clone();
        window.window.vsync = !old.window.vsync;
        assert!(needs_restart(&old, &window));
    }

    #[test]
    fn test_wireframe_flag_from_config() {
        let mut config = Config::default();
        config.debug.wireframe_mode = true;
        let app = AppState::new(config, PathBuf::new()).expect("valid config");
        assert!(app.wireframe);
    }
}
