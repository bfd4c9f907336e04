//! The tank, ball-ring and follow-camera scene driven by the headless CLI.

use glam::Vec3;
use scenecam_anim::{
    Direction, Oscillator, OscillatorConfig, RingConfig, RingFormation, Spinner, SpinnerConfig,
};
use scenecam_camera::{Camera, CameraRig, FixedRig, FollowRig, FreeFlyRig, Lens, RigCamera, Viewport};
use scenecam_common::{FrameStep, NodeId, REFERENCE_FRAME_RATE};
use scenecam_input::{ControllerConfig, KeyboardState, TankController};
use scenecam_render::{FrameView, Renderer};
use scenecam_scene::{SceneError, SceneGraph, TransformNode};
use serde::{Deserialize, Serialize};

/// Which rig drives the demo camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Trail the tank; keys steer the tank.
    #[default]
    Follow,
    /// Parked overview; keys steer the tank.
    Fixed,
    /// Detached debug eye; keys steer the camera and the tank stays put.
    FreeFly,
}

/// Every tunable of the demo. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub width: i32,
    pub height: i32,
    pub lens: Lens,
    pub camera: CameraMode,
    pub follow: FollowRig,
    pub fixed: FixedRig,
    pub free_fly: FreeFlyRig,
    pub controller: ControllerConfig,
    pub inner_ring: RingConfig,
    pub outer_ring: RingConfig,
    pub fan: OscillatorConfig,
    pub score: SpinnerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            lens: Lens::default(),
            camera: CameraMode::default(),
            follow: FollowRig::default(),
            fixed: FixedRig {
                eye: Vec3::new(0.0, 50.0, 50.0),
                reference: Vec3::ZERO,
            },
            free_fly: FreeFlyRig::default(),
            controller: ControllerConfig::default(),
            inner_ring: RingConfig::default(),
            outer_ring: RingConfig {
                radius: 40.0,
                direction: Direction::Clockwise,
                ..RingConfig::default()
            },
            fan: OscillatorConfig::default(),
            score: SpinnerConfig::default(),
        }
    }
}

/// Local free-fly motion for held keys: W/S forward and back, A/D strafe.
pub fn fly_motion(keys: KeyboardState) -> Vec3 {
    let axis = |positive: bool, negative: bool| positive as i8 as f32 - negative as i8 as f32;
    Vec3::new(
        axis(keys.turn_right, keys.turn_left),
        0.0,
        axis(keys.forward, keys.backward),
    )
}

/// Handles of the six tank parts.
#[derive(Debug, Clone, Copy)]
pub struct TankParts {
    pub tower: NodeId,
    pub base: NodeId,
    pub score: NodeId,
    pub engine_right: NodeId,
    pub engine_left: NodeId,
    pub fan: NodeId,
}

impl TankParts {
    pub fn all(&self) -> [NodeId; 6] {
        [
            self.tower,
            self.base,
            self.score,
            self.engine_right,
            self.engine_left,
            self.fan,
        ]
    }

    fn spawn(graph: &mut SceneGraph) -> Result<Self, SceneError> {
        let tower = graph.spawn(TransformNode::named("tower").with_scale(Vec3::splat(2.0)));
        let base = graph.spawn_child(
            tower,
            TransformNode::named("base").with_translation(Vec3::new(0.0, 0.7, 0.0)),
        )?;
        let score = graph.spawn_child(
            base,
            TransformNode::named("score")
                .with_translation(Vec3::new(0.0, 1.0, 0.0))
                .with_scale(Vec3::splat(2.0)),
        )?;
        let engine_right = graph.spawn_child(
            tower,
            TransformNode::named("engine_r")
                .with_translation(Vec3::new(0.22, 0.3, 0.22))
                .with_rotation(Vec3::new(0.0, 45.0_f32.to_radians(), 0.0)),
        )?;
        let engine_left = graph.spawn_child(
            tower,
            TransformNode::named("engine_l")
                .with_translation(Vec3::new(-0.22, 0.3, 0.22))
                .with_rotation(Vec3::new(0.0, -45.0_f32.to_radians(), 0.0)),
        )?;
        let fan = graph.spawn_child(
            tower,
            TransformNode::named("fan").with_translation(Vec3::new(0.0, 0.3, 1.0)),
        )?;
        Ok(Self {
            tower,
            base,
            score,
            engine_right,
            engine_left,
            fan,
        })
    }
}

pub struct DemoScene {
    graph: SceneGraph,
    camera: RigCamera,
    controller: TankController,
    spinner: Spinner,
    fan: Oscillator,
    rings: Vec<RingFormation>,
    tank: TankParts,
    frame: u64,
}

impl DemoScene {
    pub fn new(config: &DemoConfig) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        graph.spawn(TransformNode::named("skydome"));
        graph.spawn(TransformNode::named("ground"));
        let tank = TankParts::spawn(&mut graph)?;

        let mut rings = Vec::with_capacity(2);
        for (prefix, ring_config) in [("ball", &config.inner_ring), ("ball_outer", &config.outer_ring)] {
            let mut ring = RingFormation::new(ring_config);
            ring.spawn_members(&mut graph, None, prefix)?;
            rings.push(ring);
        }

        let camera = Camera::with_lens(Viewport::new(config.width, config.height), config.lens);
        let rig = match config.camera {
            CameraMode::Follow => CameraRig::Follow(config.follow),
            CameraMode::Fixed => CameraRig::Fixed(config.fixed),
            CameraMode::FreeFly => CameraRig::FreeFly(config.free_fly),
        };
        let mut scene = Self {
            graph,
            camera: RigCamera::new(camera, rig),
            controller: TankController::new(config.controller),
            spinner: Spinner::new(config.score),
            fan: Oscillator::new(config.fan),
            rings,
            tank,
            frame: 0,
        };
        scene.follow_tank()?;
        tracing::debug!(nodes = scene.graph.len(), "demo scene built");
        Ok(scene)
    }

    /// Run one frame: input, animation, camera, in that order.
    ///
    /// Every mutation of the frame is done when the returned view is built,
    /// so world matrices read afterwards are consistent with it.
    pub fn tick(&mut self, keys: KeyboardState, step: FrameStep) -> Result<FrameView, SceneError> {
        let _span = tracing::info_span!("frame", frame = self.frame).entered();

        match self.camera.free_fly_mut() {
            Some(fly) => fly.fly(fly_motion(keys), step.frames() / REFERENCE_FRAME_RATE),
            None => {
                self.controller.set_keys(keys);
                self.graph.update(self.tank.tower, &mut self.controller, step)?;
            }
        }
        self.graph.update(self.tank.score, &mut self.spinner, step)?;
        self.graph.update(self.tank.fan, &mut self.fan, step)?;
        for ring in &mut self.rings {
            ring.update(&mut self.graph, step)?;
        }

        self.follow_tank()?;
        self.frame += 1;
        Ok(self.view())
    }

    fn follow_tank(&mut self) -> Result<(), SceneError> {
        let tower = self.graph.node(self.tank.tower)?;
        if let Some(rig) = self.camera.follow_mut() {
            rig.track(tower);
        }
        self.camera.update();
        Ok(())
    }

    pub fn view(&self) -> FrameView {
        FrameView::from_camera(self.camera.camera())
    }

    pub fn render<R: Renderer>(&self, renderer: &R) -> R::Output {
        renderer.render(&self.graph, &self.view())
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &RigCamera {
        &self.camera
    }

    pub fn tank(&self) -> &TankParts {
        &self.tank
    }

    pub fn rings(&self) -> &[RingFormation] {
        &self.rings
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecam_render::{DebugTextRenderer, UniformCollector};

    fn scene() -> DemoScene {
        DemoScene::new(&DemoConfig::default()).unwrap()
    }

    #[test]
    fn builds_full_scene() {
        let scene = scene();
        // skydome + ground + 6 tank parts + 2 rings of 10
        assert_eq!(scene.graph().len(), 28);
        assert_eq!(scene.graph().parent(scene.tank().score), Some(scene.tank().base));
        assert_eq!(scene.graph().depth(scene.tank().score), 2);
        assert_eq!(scene.rings()[1].orbit().direction(), Direction::Clockwise);
    }

    #[test]
    fn tank_parts_hang_off_tower() {
        let scene = scene();
        let tank = scene.tank();
        for part in &tank.all()[1..] {
            assert_ne!(scene.graph().depth(*part), 0);
        }
        assert_eq!(scene.graph().children(tank.tower).len(), 4);
        let right = scene.graph().node(tank.engine_right).unwrap().heading();
        let left = scene.graph().node(tank.engine_left).unwrap().heading();
        assert_eq!(right, -left);
    }

    #[test]
    fn score_sits_on_scaled_base() {
        let scene = scene();
        let p = scene.graph().world_position(scene.tank().score).unwrap();
        // tower scale 2 applies to (0, 0.7 + 1.0, 0)
        assert!(p.abs_diff_eq(Vec3::new(0.0, 3.4, 0.0), 1e-5));
    }

    #[test]
    fn camera_starts_behind_tank() {
        let scene = scene();
        let cam = scene.camera().camera();
        assert_eq!(cam.ref_pos(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(cam.eye_pos(), Vec3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn driving_forward_moves_tank_and_camera() {
        let mut scene = scene();
        for _ in 0..10 {
            scene.tick(KeyboardState::from_keys("w"), FrameStep::ONE).unwrap();
        }
        let tower = scene.graph().node(scene.tank().tower).unwrap().translation();
        assert!(tower.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
        let cam = scene.camera().camera();
        assert!(cam.ref_pos().abs_diff_eq(Vec3::new(0.0, 2.0, -1.0), 1e-5));
        assert!(cam.eye_pos().abs_diff_eq(Vec3::new(0.0, 2.0, 4.0), 1e-5));
        assert_eq!(scene.frame(), 10);
    }

    #[test]
    fn turning_swings_camera_around() {
        let mut scene = scene();
        scene.tick(KeyboardState::from_keys("a"), FrameStep::ONE).unwrap();
        let heading = scene.graph().node(scene.tank().tower).unwrap().heading();
        assert_eq!(heading, 0.03);
        let cam = scene.camera().camera();
        let offset = cam.eye_pos() - cam.ref_pos();
        assert!((offset.length() - 5.0).abs() < 1e-5);
        assert!(offset.x > 0.0);
    }

    #[test]
    fn rings_counter_rotate() {
        let mut scene = scene();
        for _ in 0..30 {
            scene.tick(KeyboardState::default(), FrameStep::ONE).unwrap();
        }
        let inner = scene.rings()[0].orbit().phase();
        let outer = scene.rings()[1].orbit().phase();
        assert!(inner > 0.0);
        assert_eq!(inner, -outer);
    }

    #[test]
    fn frame_output_is_consistent() {
        let mut scene = scene();
        let view = scene.tick(KeyboardState::from_keys("wd"), FrameStep::ONE).unwrap();
        let calls = scene.render(&UniformCollector::new());
        assert_eq!(calls.len(), scene.graph().len());
        assert!(calls.iter().all(|c| c.uniforms.view == view.view.to_cols_array_2d()));

        let text = scene.render(&DebugTextRenderer::new());
        assert!(text.contains("28 nodes"));
        assert!(text.contains("ball_outer9"));
    }

    #[test]
    fn free_fly_keys_move_camera_not_tank() {
        let config = DemoConfig {
            camera: CameraMode::FreeFly,
            ..DemoConfig::default()
        };
        let mut scene = DemoScene::new(&config).unwrap();
        let start = scene.camera().camera().eye_pos();
        let forward = config.free_fly.forward();

        // 60 reference frames is one second at `speed` units per second.
        for _ in 0..60 {
            scene.tick(KeyboardState::from_keys("w"), FrameStep::ONE).unwrap();
        }
        let eye = scene.camera().camera().eye_pos();
        assert!(eye.abs_diff_eq(start + forward * config.free_fly.speed, 1e-3));
        let tower = scene.graph().node(scene.tank().tower).unwrap().translation();
        assert_eq!(tower, Vec3::ZERO);
    }

    #[test]
    fn fixed_camera_ignores_tank() {
        let config = DemoConfig {
            camera: CameraMode::Fixed,
            ..DemoConfig::default()
        };
        let mut scene = DemoScene::new(&config).unwrap();
        for _ in 0..5 {
            scene.tick(KeyboardState::from_keys("w"), FrameStep::ONE).unwrap();
        }
        assert_eq!(scene.camera().camera().eye_pos(), config.fixed.eye);
        let tower = scene.graph().node(scene.tank().tower).unwrap().translation();
        assert!(tower.z < 0.0);
    }

    #[test]
    fn fly_motion_maps_keys() {
        assert_eq!(fly_motion(KeyboardState::from_keys("wd")), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(fly_motion(KeyboardState::from_keys("sa")), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(fly_motion(KeyboardState::from_keys("ws")), Vec3::ZERO);
    }

    #[test]
    fn camera_mode_parses_from_config() {
        let config: DemoConfig = serde_json::from_str(r#"{ "camera": "free_fly" }"#).unwrap();
        assert_eq!(config.camera, CameraMode::FreeFly);
        let scene = DemoScene::new(&config).unwrap();
        assert_eq!(scene.camera().rig().kind(), "free_fly");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: DemoConfig = serde_json::from_str(r#"{ "width": 1600 }"#).unwrap();
        assert_eq!(config.width, 1600);
        assert_eq!(config.height, 600);
        assert_eq!(config.outer_ring.radius, 40.0);
        let scene = DemoScene::new(&config).unwrap();
        assert_eq!(scene.camera().camera().viewport().width(), 1600);
    }
}
