use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective lens: fixed vertical field of view and clip distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lens {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Lens {
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Output size in pixels. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawViewport")]
pub struct Viewport {
    width: u32,
    height: u32,
}

/// Unvalidated wire form; deserialized sizes are clamped like [`Viewport::new`].
#[derive(Deserialize)]
struct RawViewport {
    width: i32,
    height: i32,
}

impl From<RawViewport> for Viewport {
    fn from(raw: RawViewport) -> Self {
        Self::new(raw.width, raw.height)
    }
}

impl Viewport {
    /// Build a viewport, clamping non-positive dimensions to 1.
    pub fn new(width: i32, height: i32) -> Self {
        if width < 1 || height < 1 {
            tracing::warn!(width, height, "clamping non-positive viewport size");
        }
        Self {
            width: width.max(1) as u32,
            height: height.max(1) as u32,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Look-at camera producing right-handed view and projection matrices.
///
/// The view matrix is rebuilt on every [`update`](Self::update). The
/// projection is rebuilt only after the viewport or lens changed. A freshly
/// constructed camera has already run one update.
///
/// An eye equal to the reference point, or a view direction parallel to `up`,
/// yields a non-finite view matrix. That configuration is not special-cased.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    reference: Vec3,
    up: Vec3,
    viewport: Viewport,
    lens: Lens,
    view: Mat4,
    proj: Mat4,
    proj_dirty: bool,
}

impl Camera {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_lens(Viewport::new(width, height), Lens::default())
    }

    pub fn with_lens(viewport: Viewport, lens: Lens) -> Self {
        let mut camera = Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            reference: Vec3::ZERO,
            up: Vec3::Y,
            viewport,
            lens,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            proj_dirty: true,
        };
        camera.update();
        camera
    }

    pub fn set_eye_pos(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    pub fn set_ref_pos(&mut self, reference: Vec3) {
        self.reference = reference;
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        let viewport = Viewport::new(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.proj_dirty = true;
        }
    }

    pub fn set_lens(&mut self, lens: Lens) {
        if lens != self.lens {
            self.lens = lens;
            self.proj_dirty = true;
        }
    }

    pub fn eye_pos(&self) -> Vec3 {
        self.eye
    }

    pub fn ref_pos(&self) -> Vec3 {
        self.reference
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn lens(&self) -> Lens {
        self.lens
    }

    /// View matrix from the most recent update.
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Projection matrix from the most recent update.
    pub fn proj(&self) -> Mat4 {
        self.proj
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }

    pub fn update(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.reference, self.up);
        if self.proj_dirty {
            self.proj = self.lens.projection(self.viewport.aspect());
            self.proj_dirty = false;
            tracing::trace!(
                width = self.viewport.width(),
                height = self.viewport.height(),
                "rebuilt projection"
            );
        }
    }
}
