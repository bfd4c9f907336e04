use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use scenecam_camera::Camera;
use scenecam_common::NodeId;
use scenecam_scene::{SceneGraph, normal_from_world};

/// View and projection for one frame, passed explicitly to every renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub view: Mat4,
    pub proj: Mat4,
    /// Eye position in world space.
    pub eye: Vec3,
}

impl Default for FrameView {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            eye: Vec3::ZERO,
        }
    }
}

impl FrameView {
    /// Capture the matrices of an already-updated camera.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view(),
            proj: camera.proj(),
            eye: camera.eye_pos(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }
}

/// Per-draw uniform block, laid out for direct upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl DrawUniforms {
    pub fn new(world: Mat4, normal: Mat4, view: &FrameView) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            view: view.view.to_cols_array_2d(),
            proj: view.proj.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
        }
    }

    pub fn world(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.world)
    }
}

/// One entity's draw request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub node: NodeId,
    pub uniforms: DrawUniforms,
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &SceneGraph, view: &FrameView) -> Self::Output;
}

/// Builds the uniform block of every node, in slot order.
#[derive(Debug, Default)]
pub struct UniformCollector;

impl UniformCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for UniformCollector {
    type Output = Vec<DrawCall>;

    fn render(&self, scene: &SceneGraph, view: &FrameView) -> Vec<DrawCall> {
        let _span = tracing::trace_span!("collect_uniforms").entered();
        scene
            .world_matrices()
            .into_iter()
            .map(|(node, world)| {
                let normal = normal_from_world(world);
                DrawCall {
                    node,
                    uniforms: DrawUniforms::new(world, normal, view),
                }
            })
            .collect()
    }
}

/// Human-readable dump of the frame: camera plus each node's world position.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, view: &FrameView) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Frame ({} nodes) ===\n", scene.len()));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2})\n",
            view.eye.x, view.eye.y, view.eye.z
        ));

        for (id, world) in scene.world_matrices() {
            let p = world.transform_point3(Vec3::ZERO);
            let clip = view.view_proj() * p.extend(1.0);
            let name = scene.get(id).map(|n| n.name()).unwrap_or_default();
            out.push_str(&format!(
                "  [{id}] {name:<10} pos=({:.2}, {:.2}, {:.2}) depth={:.3}\n",
                p.x,
                p.y,
                p.z,
                if clip.w != 0.0 { clip.z / clip.w } else { 0.0 }
            ));
        }

        out
    }
}
