use glam::{Mat4, Vec3};
use scenecam_common::{FrameStep, NodeId};

use crate::node::{NodeDriver, TransformNode};

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("node {0} cannot be its own parent")]
    SelfParent(NodeId),
    #[error("parenting {child} under {parent} would create a cycle")]
    ParentCycle { child: NodeId, parent: NodeId },
}

/// Inverse transpose of `world`, or the identity when `world` is singular.
pub fn normal_from_world(world: Mat4) -> Mat4 {
    const EPSILON: f32 = 1e-6;
    if world.determinant().abs() < EPSILON {
        Mat4::IDENTITY
    } else {
        world.inverse().transpose()
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<TransformNode>,
}

/// Arena of transform nodes addressed by generational handles.
///
/// Parents are stored as handles and resolved on every query. A handle whose
/// node has been removed does not resolve, so a child of a removed parent
/// behaves as a root instead of reading freed state. Cycles are rejected at
/// [`set_parent`](Self::set_parent), which keeps every parent walk finite.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a node as a root. Any parent carried by `node` is discarded.
    pub fn spawn(&mut self, mut node: TransformNode) -> NodeId {
        node.parent = None;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(index, 0)
            }
        };
        self.len += 1;
        tracing::debug!(%id, "spawned node");
        id
    }

    /// Insert a node directly under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        node: TransformNode,
    ) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.spawn(node);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Remove a node. Its children are detached and become roots.
    pub fn remove(&mut self, id: NodeId) -> Result<TransformNode, SceneError> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        let orphans = self.children(id);
        for child in &orphans {
            if let Some(node) = self.get_mut(*child) {
                node.parent = None;
            }
        }
        if !orphans.is_empty() {
            tracing::warn!(%id, orphaned = orphans.len(), "removed node with children");
        }

        let slot = &mut self.slots[id.index as usize];
        let node = slot.node.take().ok_or(SceneError::NodeNotFound(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        tracing::debug!(%id, "removed node");
        Ok(node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Like [`get`](Self::get) but reports a missing node as an error.
    pub fn node(&self, id: NodeId) -> Result<&TransformNode, SceneError> {
        self.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut TransformNode, SceneError> {
        self.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Assign or clear the parent of `child`.
    ///
    /// Rejects unknown handles, self-parenting and any assignment that would
    /// make `child` its own ancestor. Re-parenting is allowed.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.contains(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if let Some(parent) = parent {
            if parent == child {
                return Err(SceneError::SelfParent(child));
            }
            if !self.contains(parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(SceneError::ParentCycle { child, parent });
                }
                cursor = self.parent(ancestor);
            }
        }

        self.node_mut(child)?.parent = parent;
        match parent {
            Some(parent) => tracing::debug!(%child, %parent, "set parent"),
            None => tracing::debug!(%child, "cleared parent"),
        }
        Ok(())
    }

    /// Resolved parent of `id`. Returns `None` for roots, for unknown nodes
    /// and for parents that no longer exist.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .and_then(|node| node.parent)
            .filter(|parent| self.contains(*parent))
    }

    /// Direct children of `id`, in slot order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.parent == Some(id))
            .map(|(child, _)| child)
            .collect()
    }

    /// Number of resolved ancestors above `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(ancestor) = cursor {
            depth += 1;
            cursor = self.parent(ancestor);
        }
        depth
    }

    /// Live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .map(|node| (NodeId::new(index as u32, slot.generation), node))
        })
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// First live node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.name() == name)
            .map(|(id, _)| id)
    }

    /// Local transform composed with every resolved ancestor.
    ///
    /// Evaluated fresh on each call and never mutates the graph, so repeated
    /// calls without intervening mutation return identical matrices.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut world = self.node(id)?.local_matrix();
        let mut cursor = self.parent(id);
        while let Some(ancestor) = cursor {
            let node = self.node(ancestor)?;
            world = node.local_matrix() * world;
            cursor = self.parent(ancestor);
        }
        Ok(world)
    }

    /// World matrices of every live node, in slot order.
    ///
    /// Shares ancestor results across siblings. Each parent is composed the
    /// same way as in [`world_matrix`](Self::world_matrix), so results match
    /// it within float rounding.
    pub fn world_matrices(&self) -> Vec<(NodeId, Mat4)> {
        let _span = tracing::trace_span!("world_matrices", nodes = self.len).entered();
        let mut cache: Vec<Option<Mat4>> = vec![None; self.slots.len()];
        let mut out = Vec::with_capacity(self.len);
        for (id, _) in self.iter() {
            let world = self.cached_world(id, &mut cache);
            out.push((id, world));
        }
        out
    }

    fn cached_world(&self, id: NodeId, cache: &mut [Option<Mat4>]) -> Mat4 {
        if let Some(world) = cache[id.index as usize] {
            return world;
        }
        // Walk up to the first ancestor that is already cached (or a root).
        let mut chain = vec![id];
        let mut base = Mat4::IDENTITY;
        let mut cursor = self.parent(id);
        while let Some(ancestor) = cursor {
            if let Some(world) = cache[ancestor.index as usize] {
                base = world;
                break;
            }
            chain.push(ancestor);
            cursor = self.parent(ancestor);
        }

        let mut world = base;
        for link in chain.iter().rev() {
            if let Some(node) = self.get(*link) {
                world *= node.local_matrix();
            }
            cache[link.index as usize] = Some(world);
        }
        world
    }

    /// World-space origin of a node.
    pub fn world_position(&self, id: NodeId) -> Result<Vec3, SceneError> {
        Ok(self.world_matrix(id)?.transform_point3(Vec3::ZERO))
    }

    /// Inverse transpose of the world matrix, for transforming normals.
    ///
    /// Singular world matrices (for example a zero scale) yield the identity
    /// instead of NaN values.
    pub fn normal_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        Ok(normal_from_world(self.world_matrix(id)?))
    }

    /// Run a per-frame driver against one node's local transform.
    pub fn update(
        &mut self,
        id: NodeId,
        driver: &mut dyn NodeDriver,
        step: FrameStep,
    ) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        driver.update(node, step);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Still;
    use std::f32::consts::FRAC_PI_2;

    fn sample(t: Vec3, r: Vec3, s: Vec3) -> TransformNode {
        TransformNode::new()
            .with_translation(t)
            .with_rotation(r)
            .with_scale(s)
    }

    #[test]
    fn graph_starts_empty() {
        let g = SceneGraph::new();
        assert!(g.is_empty());
        assert_eq!(g.len(), 0);
    }

    #[test]
    fn spawn_and_remove() {
        let mut g = SceneGraph::new();
        let id = g.spawn(TransformNode::named("a"));
        assert_eq!(g.len(), 1);
        assert!(g.contains(id));
        assert_eq!(g.find("a"), Some(id));

        let node = g.remove(id).unwrap();
        assert_eq!(node.name(), "a");
        assert!(!g.contains(id));
        assert!(g.is_empty());
        assert_eq!(g.remove(id), Err(SceneError::NodeNotFound(id)));
    }

    #[test]
    fn reused_slot_does_not_resolve_stale_handle() {
        let mut g = SceneGraph::new();
        let old = g.spawn(TransformNode::named("old"));
        g.remove(old).unwrap();
        let new = g.spawn(TransformNode::named("new"));
        assert_eq!(old.index, new.index);
        assert_ne!(old, new);
        assert!(g.get(old).is_none());
        assert_eq!(g.node(new).unwrap().name(), "new");
    }

    #[test]
    fn root_world_matrix_is_local() {
        let mut g = SceneGraph::new();
        let node = sample(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.4, -0.2, 1.3),
            Vec3::new(2.0, 1.0, 0.5),
        );
        let local = node.local_matrix();
        let id = g.spawn(node);
        assert_eq!(g.world_matrix(id).unwrap(), local);
    }

    #[test]
    fn parenting_composes_parent_world() {
        let mut g = SceneGraph::new();
        let parent = g.spawn(sample(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, FRAC_PI_2, 0.0),
            Vec3::splat(2.0),
        ));
        let child = g
            .spawn_child(parent, TransformNode::new().with_translation(Vec3::new(0.0, 0.0, 1.0)))
            .unwrap();

        // Child offset (0,0,1) is doubled and yawed onto +X, then moved by the parent.
        let p = g.world_position(child).unwrap();
        assert!(p.abs_diff_eq(Vec3::new(12.0, 0.0, 0.0), 1e-5));

        let expected = g.world_matrix(parent).unwrap() * g.node(child).unwrap().local_matrix();
        assert_eq!(g.world_matrix(child).unwrap(), expected);
    }

    #[test]
    fn three_level_chain_associates() {
        let mut g = SceneGraph::new();
        let a = g.spawn(sample(
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(0.3, 1.2, -0.4),
            Vec3::new(1.5, 1.0, 2.0),
        ));
        let b = g
            .spawn_child(
                a,
                sample(
                    Vec3::new(0.0, 0.7, 0.0),
                    Vec3::new(-0.9, 0.1, 0.25),
                    Vec3::splat(0.5),
                ),
            )
            .unwrap();
        let c = g
            .spawn_child(
                b,
                sample(
                    Vec3::new(0.22, 0.3, 0.22),
                    Vec3::new(0.0, 0.785, 0.0),
                    Vec3::new(2.0, 2.0, 1.0),
                ),
            )
            .unwrap();

        let la = g.node(a).unwrap().local_matrix();
        let lb = g.node(b).unwrap().local_matrix();
        let lc = g.node(c).unwrap().local_matrix();

        let left = (la * lb) * lc;
        let right = la * (lb * lc);
        let world = g.world_matrix(c).unwrap();
        assert!(world.abs_diff_eq(left, 1e-5));
        assert!(world.abs_diff_eq(right, 1e-5));
        assert!(world.abs_diff_eq(g.world_matrix(b).unwrap() * lc, 1e-5));
        assert_eq!(g.depth(c), 2);
    }

    #[test]
    fn world_matrix_idempotent() {
        let mut g = SceneGraph::new();
        let a = g.spawn(sample(Vec3::ONE, Vec3::new(0.1, 0.2, 0.3), Vec3::splat(1.1)));
        let b = g
            .spawn_child(a, sample(Vec3::X, Vec3::new(1.0, 2.0, 3.0), Vec3::ONE))
            .unwrap();
        let first = g.world_matrix(b).unwrap();
        let second = g.world_matrix(b).unwrap();
        assert_eq!(first.to_cols_array(), second.to_cols_array());
    }

    #[test]
    fn parent_mutation_visible_immediately() {
        let mut g = SceneGraph::new();
        let a = g.spawn(TransformNode::new());
        let b = g
            .spawn_child(a, TransformNode::new().with_translation(Vec3::Y))
            .unwrap();
        g.node_mut(a).unwrap().set_translation(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(g.world_position(b).unwrap(), Vec3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn batch_matches_single_queries() {
        let mut g = SceneGraph::new();
        let a = g.spawn(sample(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.5, 0.0), Vec3::splat(2.0)));
        let b = g.spawn_child(a, sample(Vec3::Z, Vec3::X, Vec3::ONE)).unwrap();
        let _c = g.spawn_child(b, sample(Vec3::X, Vec3::Y, Vec3::ONE)).unwrap();
        let _d = g.spawn_child(a, sample(Vec3::NEG_X, Vec3::Z, Vec3::ONE)).unwrap();
        let _e = g.spawn(TransformNode::new());

        let batch = g.world_matrices();
        assert_eq!(batch.len(), g.len());
        for (id, world) in batch {
            assert!(world.abs_diff_eq(g.world_matrix(id).unwrap(), 1e-5));
        }
    }

    #[test]
    fn clearing_parent_makes_root() {
        let mut g = SceneGraph::new();
        let a = g.spawn(TransformNode::new().with_translation(Vec3::X));
        let b = g.spawn_child(a, TransformNode::new()).unwrap();
        g.set_parent(b, None).unwrap();
        assert_eq!(g.parent(b), None);
        assert_eq!(g.world_matrix(b).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn removing_parent_orphans_children() {
        let mut g = SceneGraph::new();
        let a = g.spawn(TransformNode::new().with_translation(Vec3::X));
        let b = g
            .spawn_child(a, TransformNode::new().with_translation(Vec3::Y))
            .unwrap();
        g.remove(a).unwrap();
        assert_eq!(g.parent(b), None);
        assert!(g.node(b).unwrap().parent().is_none());
        assert_eq!(g.world_position(b).unwrap(), Vec3::Y);
    }

    #[test]
    fn self_parent_rejected() {
        let mut g = SceneGraph::new();
        let a = g.spawn(TransformNode::new());
        assert_eq!(g.set_parent(a, Some(a)), Err(SceneError::SelfParent(a)));
    }

    #[test]
    fn cycle_rejected() {
        let mut g = SceneGraph::new();
        let a = g.spawn(TransformNode::new());
        let b = g.spawn_child(a, TransformNode::new()).unwrap();
        let c = g.spawn_child(b, TransformNode::new()).unwrap();
        assert_eq!(
            g.set_parent(a, Some(c)),
            Err(SceneError::ParentCycle { child: a, parent: c })
        );
        // Graph is unchanged.
        assert_eq!(g.parent(a), None);
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut g = SceneGraph::new();
        let a = g.spawn(TransformNode::new());
        let gone = g.spawn(TransformNode::new());
        g.remove(gone).unwrap();
        assert_eq!(g.set_parent(a, Some(gone)), Err(SceneError::NodeNotFound(gone)));
        assert!(g.spawn_child(gone, TransformNode::new()).is_err());
    }

    #[test]
    fn children_lists_direct_descendants() {
        let mut g = SceneGraph::new();
        let tower = g.spawn(TransformNode::named("tower"));
        let base = g.spawn_child(tower, TransformNode::named("base")).unwrap();
        let fan = g.spawn_child(tower, TransformNode::named("fan")).unwrap();
        let _score = g.spawn_child(base, TransformNode::named("score")).unwrap();
        assert_eq!(g.children(tower), vec![base, fan]);
    }

    #[test]
    fn normal_matrix_singular_falls_back() {
        let mut g = SceneGraph::new();
        let flat = g.spawn(TransformNode::new().with_scale(Vec3::ZERO));
        assert_eq!(g.normal_matrix(flat).unwrap(), Mat4::IDENTITY);

        let stretched = g.spawn(TransformNode::new().with_scale(Vec3::new(1.0, 2.0, 1.0)));
        let expected = g.world_matrix(stretched).unwrap().inverse().transpose();
        assert_eq!(g.normal_matrix(stretched).unwrap(), expected);
    }

    #[test]
    fn normal_from_world_keeps_normals_perpendicular() {
        let world = Mat4::from_scale(Vec3::new(1.0, 4.0, 1.0));
        let tangent = world.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let normal = normal_from_world(world).transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(tangent.dot(normal).abs() < 1e-6);
        assert_eq!(normal_from_world(Mat4::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn update_runs_driver() {
        struct Nudge;
        impl NodeDriver for Nudge {
            fn update(&mut self, node: &mut TransformNode, step: FrameStep) {
                let t = node.translation();
                node.set_translation(t + Vec3::X * step.frames());
            }
        }

        let mut g = SceneGraph::new();
        let id = g.spawn(TransformNode::new());
        g.update(id, &mut Nudge, FrameStep(2.0)).unwrap();
        g.update(id, &mut Still, FrameStep::ONE).unwrap();
        assert_eq!(g.node(id).unwrap().translation(), Vec3::new(2.0, 0.0, 0.0));
    }
}
