use glam::{Mat3, Mat4, Vec3};
use scenecam_scene::TransformNode;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

/// Camera parked at a fixed eye, looking at a fixed reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedRig {
    pub eye: Vec3,
    pub reference: Vec3,
}

impl Default for FixedRig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            reference: Vec3::ZERO,
        }
    }
}

/// Third-person rig trailing a target at a fixed distance behind its heading.
///
/// The reference point sits `height` above the target. The eye sits at
/// `distance` from the reference along local +Z rotated by the heading, which
/// is directly behind a target that moves along its local -Z. Eye and
/// reference are derived from the target every update with no smoothing, so a
/// heading jump moves the camera in the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowRig {
    pub target_pos: Vec3,
    pub target_angle: f32,
    pub distance: f32,
    pub height: f32,
}

impl Default for FollowRig {
    fn default() -> Self {
        Self {
            target_pos: Vec3::ZERO,
            target_angle: 0.0,
            distance: 5.0,
            height: 2.0,
        }
    }
}

impl FollowRig {
    pub fn set_target_pos(&mut self, pos: Vec3) {
        self.target_pos = pos;
    }

    pub fn set_target_angle(&mut self, radians: f32) {
        self.target_angle = radians;
    }

    /// Follow a root node: its translation and yaw become the target.
    pub fn track(&mut self, node: &TransformNode) {
        self.target_pos = node.translation();
        self.target_angle = node.heading();
    }

    pub fn reference(&self) -> Vec3 {
        self.target_pos + Vec3::new(0.0, self.height, 0.0)
    }

    pub fn eye(&self) -> Vec3 {
        let offset = Mat3::from_rotation_y(self.target_angle) * Vec3::new(0.0, 0.0, self.distance);
        self.reference() + offset
    }
}

/// Free-fly debug rig: a detached eye steered on its own local axes.
///
/// `yaw` is measured from +X towards +Z and `pitch` from the horizontal plane,
/// both in radians. Pitch stays within ±89° so the view never parallels `up`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeFlyRig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second along each local axis.
    pub speed: f32,
}

impl Default for FreeFlyRig {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 30.0, 60.0), Vec3::ZERO)
    }
}

impl FreeFlyRig {
    const PITCH_LIMIT: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

    /// Place the rig at `position` facing `target`. A target equal to the
    /// position faces -Z.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dir = (target - position).try_normalize().unwrap_or(Vec3::NEG_Z);
        Self {
            position,
            yaw: dir.z.atan2(dir.x),
            pitch: dir.y.asin().clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            speed: 10.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    /// Move by `local` (x right, y world up, z forward) at `speed` for `dt` seconds.
    pub fn fly(&mut self, local: Vec3, dt: f32) {
        let world = self.right() * local.x + Vec3::Y * local.y + self.forward() * local.z;
        self.position += world * self.speed * dt;
    }

    /// Turn by the given yaw and pitch deltas, in radians.
    pub fn look(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }
}

/// The closed set of ways a camera can derive its eye and reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraRig {
    Fixed(FixedRig),
    Follow(FollowRig),
    FreeFly(FreeFlyRig),
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::Follow(FollowRig::default())
    }
}

impl CameraRig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Follow(_) => "follow",
            Self::FreeFly(_) => "free_fly",
        }
    }

    /// Eye and reference point this rig wants this frame.
    pub fn eye_and_reference(&self) -> (Vec3, Vec3) {
        match self {
            Self::Fixed(rig) => (rig.eye, rig.reference),
            Self::Follow(rig) => (rig.eye(), rig.reference()),
            Self::FreeFly(rig) => (rig.position, rig.position + rig.forward()),
        }
    }

    /// Write this rig's eye and reference into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        let (eye, reference) = self.eye_and_reference();
        camera.set_eye_pos(eye);
        camera.set_ref_pos(reference);
    }
}

/// A [`Camera`] driven by a [`CameraRig`].
#[derive(Debug, Clone)]
pub struct RigCamera {
    camera: Camera,
    rig: CameraRig,
}

impl RigCamera {
    pub fn new(camera: Camera, rig: CameraRig) -> Self {
        let mut rig_camera = Self { camera, rig };
        rig_camera.update();
        rig_camera
    }

    /// Follow camera with default distance and height.
    pub fn follow(width: i32, height: i32) -> Self {
        Self::new(
            Camera::new(width, height),
            CameraRig::Follow(FollowRig::default()),
        )
    }

    /// Derive eye/reference from the rig, then rebuild view and projection.
    pub fn update(&mut self) {
        self.rig.apply(&mut self.camera);
        self.camera.update();
        let eye = self.camera.eye_pos();
        tracing::trace!(rig = self.rig.kind(), eye.x, eye.y, eye.z, "camera updated");
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn set_rig(&mut self, rig: CameraRig) {
        tracing::debug!(from = self.rig.kind(), to = rig.kind(), "switched camera rig");
        self.rig = rig;
    }

    pub fn follow_mut(&mut self) -> Option<&mut FollowRig> {
        match &mut self.rig {
            CameraRig::Follow(rig) => Some(rig),
            _ => None,
        }
    }

    pub fn free_fly_mut(&mut self) -> Option<&mut FreeFlyRig> {
        match &mut self.rig {
            CameraRig::FreeFly(rig) => Some(rig),
            _ => None,
        }
    }

    pub fn view(&self) -> Mat4 {
        self.camera.view()
    }

    pub fn proj(&self) -> Mat4 {
        self.camera.proj()
    }
}
