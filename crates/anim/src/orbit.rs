use glam::{Mat3, Vec3};
use scenecam_common::{FrameStep, NodeId};
use scenecam_scene::{NodeDriver, SceneError, SceneGraph, TransformNode};
use serde::{Deserialize, Serialize};

/// Sense of rotation about the vertical axis, seen from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    CounterClockwise,
    Clockwise,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }
}

/// An angle that advances by a fixed amount per reference frame.
///
/// It is never wrapped; the trigonometry it feeds is periodic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseAccumulator {
    phase: f32,
    step: f32,
}

impl PhaseAccumulator {
    pub fn new(step: f32) -> Self {
        Self { phase: 0.0, step }
    }

    pub fn advance(&mut self, step: FrameStep) -> f32 {
        self.phase += step.scale(self.step);
        self.phase
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}

/// Position on a horizontal circle of `radius` around the local origin.
///
/// Angle 0 is +X; positive angles turn towards -Z (counter-clockwise from above).
pub fn orbit_position(radius: f32, angle: f32) -> Vec3 {
    Mat3::from_rotation_y(angle) * Vec3::new(radius, 0.0, 0.0)
}

/// Drives an entity around a circle about its parent's vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitAnimator {
    radius: f32,
    direction: Direction,
    phase: PhaseAccumulator,
}

impl OrbitAnimator {
    /// `angular_step` is radians per reference frame, always positive;
    /// `direction` picks the sense.
    pub fn new(radius: f32, angular_step: f32, direction: Direction) -> Self {
        Self {
            radius,
            direction,
            phase: PhaseAccumulator::new(angular_step.abs() * direction.sign()),
        }
    }

    pub fn advance(&mut self, step: FrameStep) {
        self.phase.advance(step);
    }

    /// Signed accumulated angle in radians.
    pub fn phase(&self) -> f32 {
        self.phase.phase()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Angle of a member sitting `slot_offset` radians ahead on the circle.
    pub fn angle_of(&self, slot_offset: f32) -> f32 {
        slot_offset + self.phase()
    }

    pub fn position_at(&self, slot_offset: f32) -> Vec3 {
        orbit_position(self.radius, self.angle_of(slot_offset))
    }

    /// Place `node` on the circle, yawed to match its orbit angle.
    pub fn write(&self, node: &mut TransformNode, slot_offset: f32) {
        let angle = self.angle_of(slot_offset);
        node.set_translation(orbit_position(self.radius, angle));
        node.set_rotation(Vec3::new(0.0, angle, 0.0));
    }
}

impl NodeDriver for OrbitAnimator {
    fn update(&mut self, node: &mut TransformNode, step: FrameStep) {
        self.advance(step);
        self.write(node, 0.0);
    }
}

/// A ring of evenly spaced entities sharing one orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub count: usize,
    pub radius: f32,
    /// Orbit advance per reference frame, in degrees.
    pub angular_step_degrees: f32,
    pub direction: Direction,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            count: 10,
            radius: 20.0,
            angular_step_degrees: 1.0,
            direction: Direction::CounterClockwise,
        }
    }
}

/// Members of one ring and the orbit that drives them.
///
/// Members are spread evenly over the full circle, however many there are.
#[derive(Debug, Clone)]
pub struct RingFormation {
    orbit: OrbitAnimator,
    count: usize,
    members: Vec<NodeId>,
}

impl RingFormation {
    pub fn new(config: &RingConfig) -> Self {
        Self {
            orbit: OrbitAnimator::new(
                config.radius,
                config.angular_step_degrees.to_radians(),
                config.direction,
            ),
            count: config.count,
            members: Vec::with_capacity(config.count),
        }
    }

    /// Spawn the configured number of members under `parent` (or as roots),
    /// named `{prefix}{i}`, and place them at their starting angles.
    ///
    /// Calling it again adds another batch; spacing is recomputed so the
    /// whole ring stays even.
    pub fn spawn_members(
        &mut self,
        graph: &mut SceneGraph,
        parent: Option<NodeId>,
        prefix: &str,
    ) -> Result<&[NodeId], SceneError> {
        let first = self.members.len();
        for i in first..first + self.count {
            let node = TransformNode::named(format!("{prefix}{i}"));
            let id = match parent {
                Some(parent) => graph.spawn_child(parent, node)?,
                None => graph.spawn(node),
            };
            self.members.push(id);
        }
        self.place(graph)?;
        tracing::debug!(
            prefix,
            members = self.members.len(),
            radius = self.orbit.radius(),
            "spawned ring"
        );
        Ok(&self.members)
    }

    /// Advance the shared orbit once and reposition every member.
    pub fn update(&mut self, graph: &mut SceneGraph, step: FrameStep) -> Result<(), SceneError> {
        self.orbit.advance(step);
        self.place(graph)
    }

    fn place(&self, graph: &mut SceneGraph) -> Result<(), SceneError> {
        let spacing = self.spacing();
        for (i, id) in self.members.iter().enumerate() {
            let node = graph.node_mut(*id)?;
            self.orbit.write(node, i as f32 * spacing);
        }
        Ok(())
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn orbit(&self) -> &OrbitAnimator {
        &self.orbit
    }

    /// Angle between neighbouring members; zero for an empty ring.
    pub fn spacing(&self) -> f32 {
        if self.members.is_empty() {
            0.0
        } else {
            std::f32::consts::TAU / self.members.len() as f32
        }
    }
}
