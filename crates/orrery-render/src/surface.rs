//! Window surface dimensions, normalized across platforms.
//!
//! Wayland may report a zero-size window before the compositor assigns one,
//! and a minimized window reports zero on most platforms. The GPU surface is
//! never configured below 1x1, but the wrapper remembers that the window is
//! not worth drawing into.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

/// Tracks the window's physical size and scale factor as resize and DPI
/// events arrive.
#[derive(Debug, Clone)]
pub struct SurfaceWrapper {
    /// Current physical size (clamped to >= 1).
    physical: PhysicalSize,
    /// Physical pixels per logical pixel.
    scale_factor: f64,
    /// Last reported size had a zero dimension.
    minimized: bool,
}

impl SurfaceWrapper {
    /// Creates a wrapper from the initial physical size. A zero dimension is
    /// clamped to 1 and marks the surface as not renderable.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical: clamp(physical_width, physical_height),
            scale_factor,
            minimized: physical_width == 0 || physical_height == 0,
        }
    }

    /// Record a window resize. Returns the new clamped size when the surface
    /// needs reconfiguring.
    pub fn handle_resize(&mut self, physical_width: u32, physical_height: u32) -> Option<PhysicalSize> {
        self.minimized = physical_width == 0 || physical_height == 0;
        let size = clamp(physical_width, physical_height);
        if size == self.physical {
            return None;
        }
        self.physical = size;
        Some(size)
    }

    /// Moving between displays changes the physical size even when the
    /// logical size is unchanged.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<PhysicalSize> {
        self.scale_factor = scale_factor;
        self.handle_resize(physical_width, physical_height)
    }

    /// Current physical pixel dimensions for surface configuration.
    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    /// Current scale factor (physical pixels per logical pixel).
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// False while the window is minimized or has not been sized yet.
    pub fn is_renderable(&self) -> bool {
        !self.minimized
    }
}

fn clamp(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}
