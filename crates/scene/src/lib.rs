//! Scene transforms: Euler-composed transform nodes and the arena that owns them.
//!
//! # Invariants
//! - World matrices are evaluated fresh from local state on every query.
//! - Rotation is applied roll (Z), pitch (X), yaw (Y), then translation, then parent.
//! - Parent links are handles; a link that no longer resolves means "no parent".
//! - Parent chains are acyclic; `SceneGraph::set_parent` refuses to close a loop.

mod graph;
mod node;

pub use graph::{SceneError, SceneGraph, normal_from_world};
pub use node::{NodeDriver, Still, TransformNode};
