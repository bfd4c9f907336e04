use glam::{Mat4, Quat, Vec3};
use scenecam_common::{FrameStep, NodeId};
use serde::{Deserialize, Serialize};

/// Local scale / rotation / translation of one scene entity.
///
/// Rotation is a triple of Euler angles in radians: `x` is pitch, `y` is yaw,
/// `z` is roll. They are applied roll first, then pitch, then yaw, before the
/// translation and before any parent transform. The order is not commutative
/// and must not be changed.
///
/// The parent is a handle into the owning [`SceneGraph`](crate::SceneGraph)
/// and can only be changed through the graph, which validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformNode {
    name: String,
    scale: Vec3,
    rotation: Vec3,
    translation: Vec3,
    pub(crate) parent: Option<NodeId>,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            parent: None,
        }
    }
}

impl TransformNode {
    /// Identity transform, no parent.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Parent handle as last assigned. It may refer to a node that has since
    /// been removed; [`SceneGraph::parent`](crate::SceneGraph::parent) resolves it.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Yaw component of the rotation, used as the heading of steered nodes.
    pub fn heading(&self) -> f32 {
        self.rotation.y
    }

    /// Combined rotation as a quaternion (yaw * pitch * roll).
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_z(self.rotation.z)
    }

    /// Local matrix in glam's column-vector convention.
    ///
    /// In row-vector notation this is `S * Rz * Rx * Ry * T`; with column
    /// vectors the same transform reads `T * Ry * Rx * Rz * S`.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(self.scale)
    }
}

/// Per-frame hook that derives a node's local transform from external state.
pub trait NodeDriver {
    fn update(&mut self, node: &mut TransformNode, step: FrameStep);
}

/// Driver for nodes with no animation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Still;

impl NodeDriver for Still {
    fn update(&mut self, _node: &mut TransformNode, _step: FrameStep) {}
}
