//! Core data types: tree nodes going in, meshes coming out.

use std::sync::Arc;

use glam::Vec3;

use crate::error::GeometryError;

/// Unique node identifier supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl From<u64> for NodeId {
  fn from(value: u64) -> Self {
    Self(value)
  }
}

/// Geometry of a node.
///
/// Sphere, box and capsule are unit-sized closed-form primitives evaluated by
/// the scalar field. `Custom` carries externally baked geometry and `Group`
/// carries none; both only take part in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
  /// Radius 0.5.
  Sphere,
  /// Half-extent 0.5 on every axis.
  Box,
  /// Y-axis segment from -0.5 to 0.5, radius 0.5.
  Capsule,
  Custom,
  Group,
}

impl PrimitiveKind {
  /// True for kinds that contribute to the signed distance field.
  #[inline]
  pub fn is_primitive(self) -> bool {
    matches!(self, Self::Sphere | Self::Box | Self::Capsule)
  }
}

/// How a node combines with everything listed before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BooleanOp {
  #[default]
  Union,
  Subtract,
  Intersect,
}

/// Externally produced mesh data attached to a `Custom` node.
///
/// The mesher never reads it. Construction validates the buffers so a host
/// can reject broken imports before they reach the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomGeometry {
  positions: Vec<[f32; 3]>,
  indices: Vec<u32>,
  normals: Vec<[f32; 3]>,
}

impl CustomGeometry {
  pub fn new(
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
    normals: Vec<[f32; 3]>,
  ) -> Result<Self, GeometryError> {
    if indices.len() % 3 != 0 {
      return Err(GeometryError::IncompleteTriangle {
        count: indices.len(),
      });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
      return Err(GeometryError::IndexOutOfRange {
        index,
        vertex_count: positions.len(),
      });
    }
    if !normals.is_empty() && normals.len() != positions.len() {
      return Err(GeometryError::NormalCountMismatch {
        normals: normals.len(),
        vertices: positions.len(),
      });
    }
    Ok(Self {
      positions,
      indices,
      normals,
    })
  }

  pub fn positions(&self) -> &[[f32; 3]] {
    &self.positions
  }

  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  pub fn normals(&self) -> &[[f32; 3]] {
    &self.normals
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }
}

/// One member of the modelling tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
  pub id: NodeId,
  pub kind: PrimitiveKind,
  pub operation: BooleanOp,
  /// Local translation relative to the parent.
  pub translation: Vec3,
  /// Local rotation as XYZ Euler angles in radians.
  pub rotation: Vec3,
  /// Uniform local scale.
  pub scale: f32,
  pub parent: Option<NodeId>,
  pub visible: bool,
  /// Backing geometry for `Custom` nodes. Missing data is an empty
  /// contribution.
  pub custom_geometry: Option<Arc<CustomGeometry>>,
}

impl Node {
  pub fn new(id: impl Into<NodeId>, kind: PrimitiveKind) -> Self {
    Self {
      id: id.into(),
      kind,
      operation: BooleanOp::Union,
      translation: Vec3::ZERO,
      rotation: Vec3::ZERO,
      scale: 1.0,
      parent: None,
      visible: true,
      custom_geometry: None,
    }
  }

  pub fn sphere(id: impl Into<NodeId>) -> Self {
    Self::new(id, PrimitiveKind::Sphere)
  }

  pub fn cuboid(id: impl Into<NodeId>) -> Self {
    Self::new(id, PrimitiveKind::Box)
  }

  pub fn capsule(id: impl Into<NodeId>) -> Self {
    Self::new(id, PrimitiveKind::Capsule)
  }

  pub fn group(id: impl Into<NodeId>) -> Self {
    Self::new(id, PrimitiveKind::Group)
  }

  pub fn custom(id: impl Into<NodeId>, geometry: Option<Arc<CustomGeometry>>) -> Self {
    Self {
      custom_geometry: geometry,
      ..Self::new(id, PrimitiveKind::Custom)
    }
  }

  pub fn with_operation(mut self, operation: BooleanOp) -> Self {
    self.operation = operation;
    self
  }

  pub fn with_translation(mut self, translation: impl Into<Vec3>) -> Self {
    self.translation = translation.into();
    self
  }

  pub fn with_rotation(mut self, rotation: impl Into<Vec3>) -> Self {
    self.rotation = rotation.into();
    self
  }

  pub fn with_scale(mut self, scale: f32) -> Self {
    self.scale = scale;
    self
  }

  pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
    self.parent = Some(parent.into());
    self
  }

  pub fn with_visible(mut self, visible: bool) -> Self {
    self.visible = visible;
    self
  }

  /// True if this node is sampled by the scalar field.
  #[inline]
  pub fn contributes_to_field(&self) -> bool {
    self.visible && self.kind.is_primitive()
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Expand AABB to include a cube of half-size `radius` around `center`.
  #[inline]
  pub fn encapsulate_cube(&mut self, center: [f32; 3], radius: f32) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(center[i] - radius);
      self.max[i] = self.max[i].max(center[i] + radius);
    }
  }

  /// Grow every side by `margin`.
  pub fn padded(&self, margin: f32) -> Self {
    Self {
      min: self.min.map(|v| v - margin),
      max: self.max.map(|v| v + margin),
    }
  }

  pub fn extent(&self) -> [f32; 3] {
    std::array::from_fn(|i| self.max[i] - self.min[i])
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Extracted surface.
///
/// `positions` is the single owner of vertex storage. Triangles and the quad
/// wireframe both index into it, so moving a vertex is visible through both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
  pub positions: Vec<[f32; 3]>,

  /// Unit vertex normals, parallel to `positions`.
  pub normals: Vec<[f32; 3]>,

  /// Triangle indices (3 per triangle, 6 per source quad).
  pub indices: Vec<u32>,

  /// Deduplicated undirected quad outline edges, each sorted `[low, high]`.
  pub edges: Vec<[u32; 2]>,

  pub bounds: MinMaxAABB,
}

impl Mesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Number of source quads. Every quad is emitted as exactly two triangles.
  pub fn quad_count(&self) -> usize {
    self.indices.len() / 6
  }

  /// Borrowed quad-outline view over this mesh's position buffer.
  pub fn wireframe(&self) -> Wireframe<'_> {
    Wireframe {
      positions: &self.positions,
      edges: &self.edges,
    }
  }

  /// Recompute `bounds` from the current positions.
  pub fn recompute_bounds(&mut self) {
    let mut bounds = MinMaxAABB::empty();
    for &p in &self.positions {
      bounds.encapsulate(p);
    }
    self.bounds = bounds;
  }
}

/// Quad wireframe borrowing a mesh's positions.
#[derive(Clone, Copy, Debug)]
pub struct Wireframe<'a> {
  positions: &'a [[f32; 3]],
  edges: &'a [[u32; 2]],
}

impl<'a> Wireframe<'a> {
  pub fn positions(&self) -> &'a [[f32; 3]] {
    self.positions
  }

  pub fn edges(&self) -> &'a [[u32; 2]] {
    self.edges
  }

  pub fn len(&self) -> usize {
    self.edges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.edges.is_empty()
  }

  /// Line segments as endpoint pairs, ready for a line-list buffer.
  pub fn segments(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + 'a {
    let positions = self.positions;
    self
      .edges
      .iter()
      .map(move |&[a, b]| (positions[a as usize], positions[b as usize]))
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
