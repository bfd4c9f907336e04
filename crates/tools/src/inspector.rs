use scenecam_camera::Camera;
use scenecam_common::NodeId;
use scenecam_scene::SceneGraph;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the scene graph and camera for
/// debugging and the headless CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene graph.
    pub fn summary(scene: &SceneGraph) -> SceneSummary {
        let mut roots = 0;
        let mut max_depth = 0;
        for (id, _) in scene.iter() {
            let depth = scene.depth(id);
            if depth == 0 {
                roots += 1;
            }
            max_depth = max_depth.max(depth);
        }
        SceneSummary {
            node_count: scene.len(),
            roots,
            max_depth,
        }
    }

    /// Local and world placement of one node.
    pub fn inspect_node(scene: &SceneGraph, id: NodeId) -> Option<NodeInfo> {
        let node = scene.get(id)?;
        let world = scene.world_position(id).ok()?;
        Some(NodeInfo {
            id,
            name: node.name().to_owned(),
            parent: scene.parent(id),
            translation: node.translation().to_array(),
            rotation: node.rotation().to_array(),
            scale: node.scale().to_array(),
            world_position: world.to_array(),
        })
    }

    pub fn inspect_camera(camera: &Camera) -> CameraInfo {
        let viewport = camera.viewport();
        CameraInfo {
            eye: camera.eye_pos().to_array(),
            reference: camera.ref_pos().to_array(),
            width: viewport.width(),
            height: viewport.height(),
            fov_y_degrees: camera.lens().fov_y_degrees,
        }
    }

    /// Every node, parents listed before their children.
    pub fn hierarchy(scene: &SceneGraph) -> Vec<(usize, NodeId)> {
        let mut out = Vec::with_capacity(scene.len());
        let mut stack: Vec<(usize, NodeId)> = scene
            .iter()
            .filter(|(id, _)| scene.parent(*id).is_none())
            .map(|(id, _)| (0, id))
            .collect();
        stack.reverse();
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            for child in scene.children(id).into_iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub node_count: usize,
    pub roots: usize,
    pub max_depth: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} roots={} max_depth={}",
            self.node_count, self.roots, self.max_depth
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub world_position: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] {} local=({:.2}, {:.2}, {:.2}) world=({:.2}, {:.2}, {:.2})",
            self.id,
            self.name,
            self.translation[0],
            self.translation[1],
            self.translation[2],
            self.world_position[0],
            self.world_position[1],
            self.world_position[2],
        )
    }
}

#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub eye: [f32; 3],
    pub reference: [f32; 3],
    pub width: u32,
    pub height: u32,
    pub fov_y_degrees: f32,
}

impl std::fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera: eye=({:.2}, {:.2}, {:.2}) ref=({:.2}, {:.2}, {:.2}) {}x{} fov={:.0}",
            self.eye[0],
            self.eye[1],
            self.eye[2],
            self.reference[0],
            self.reference[1],
            self.reference[2],
            self.width,
            self.height,
            self.fov_y_degrees,
        )
    }
}
