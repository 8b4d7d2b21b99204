//! metaball_core - Signed distance tree meshing for metaball modelling
//!
//! This crate turns a flat, ordered list of modelling nodes (spheres, boxes,
//! capsules, custom meshes and groups arranged in a parent hierarchy) into a
//! renderable triangle mesh plus a quad wireframe.
//!
//! # Features
//!
//! - **Transform Resolver**: world matrices from the parent hierarchy with a
//!   pass-scoped memo and cycle breaking
//! - **Scalar Field**: unit primitives combined in list order with smooth
//!   union, subtraction and intersection
//! - **Surface Nets**: one vertex per crossing cell, gradient-checked quad
//!   winding, shorter-diagonal triangulation
//! - **Smart Retopology**: tangential relaxation, ring snapping along bones
//!   and Newton re-projection onto the surface
//!
//! # Example
//!
//! ```ignore
//! use metaball_core::{generate, BooleanOp, MeshParams, Node};
//!
//! let nodes = vec![
//!   Node::sphere(1),
//!   Node::capsule(2).with_translation([0.0, 0.6, 0.0]).with_parent(1),
//!   Node::cuboid(3)
//!     .with_translation([0.6, 0.0, 0.0])
//!     .with_operation(BooleanOp::Subtract),
//! ];
//!
//! let result = generate(&nodes, &MeshParams::default().with_smart_retopology(true));
//!
//! println!("Generated {} vertices, {} triangles, {} wire edges",
//!     result.mesh.vertex_count(), result.mesh.triangle_count(), result.mesh.edges.len());
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{GeometryError, SceneError, SceneResult};
pub use types::{
  BooleanOp, CustomGeometry, Mesh, MinMaxAABB, Node, NodeId, PrimitiveKind, Wireframe,
};

// Scene snapshot and transforms
pub mod scene;
pub mod transform;
pub use scene::{NodeHandle, SceneSnapshot};
pub use transform::TransformResolver;

// Field evaluation and sampling
pub mod field;
pub mod grid;
pub use field::{DistanceField, ScalarField};
pub use grid::{GridSpec, SampleGrid};

// Surface Nets module
pub mod surface_nets;

// Retopology refiner
pub mod retopo;
pub use retopo::{refine, refine_with, BoneSegment, RefineConfig};

// Full pass
pub mod pipeline;
pub use pipeline::{generate, MeshParams, MeshResult, PassTiming};
