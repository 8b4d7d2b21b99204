//! Surface Nets isosurface extraction.
//!
//! Surface Nets is a dual method: it generates ONE vertex per cell containing
//! a surface crossing, placed at the centroid of the cell's edge crossings,
//! and connects the vertices of the four cells around every sign-changing
//! grid edge with a quad.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  grid:  (n+1)³ field samples on a uniform lattice               │
//! │  field: the same field, for gradients at quad centroids         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PASS 1: Vertices                             │
//! │  For each cell:                                                 │
//! │    Build 8-bit corner mask from sign bits                       │
//! │    Early-out if homogeneous (mask == 0 or mask == 255)          │
//! │    Vertex = centroid of edge crossings, record cell → index     │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PASS 2: Quads                                │
//! │  For each cell, for each axis (X, Y, Z):                        │
//! │    Skip if the cell's edge along the axis keeps its sign        │
//! │    Skip at the low boundary (neighbours would be missing)       │
//! │    Gather the 4 cells around the edge, order by sign direction  │
//! │    Flip if the face normal opposes the field gradient           │
//! │    Split into 2 triangles                                       │
//! │    Flip any triangle facing against its own centroid gradient   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PASS 3: Edges + Normals                      │
//! │  Deduplicated quad outline edges                                │
//! │  Angle-weighted vertex normals from the triangles               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quad Orientation
//!
//! For a grid edge along axis `a`, with `u = a+1` and `v = a+2` (mod 3), the
//! four cells sharing it are visited as
//!
//! ```text
//!    v
//!    │  (c-u)────(c)
//!    │    │       │        c = cell whose low corner starts the edge
//!    │  (c-u-v)──(c-v)
//!    └──────────── u
//! ```
//!
//! `c, c-u, c-u-v, c-v` winds counter-clockwise around `+a`. That order is
//! kept when the edge goes from inside to outside, and reversed otherwise.

mod corner_mask;
pub mod normals;
pub mod quads;
mod vertex_calc;

use glam::Vec3A;

use crate::constants::CORNER_OFFSETS;
use crate::field::{DistanceField, ScalarField};
use crate::grid::{estimate_bounds, GridSpec, SampleGrid};
use crate::scene::SceneSnapshot;
use crate::transform::TransformResolver;
use crate::types::{Mesh, Node};

pub use quads::Quad;

/// Marker for a cell without a vertex.
const NO_VERTEX: u32 = u32::MAX;

/// Cell → vertex index lookup for one grid.
struct CellIndex {
  cells: [usize; 3],
  data: Vec<u32>,
}

impl CellIndex {
  fn new(cells: [usize; 3]) -> Self {
    Self {
      cells,
      data: vec![NO_VERTEX; cells[0] * cells[1] * cells[2]],
    }
  }

  #[inline]
  fn slot(&self, cell: [usize; 3]) -> usize {
    cell[0] + cell[1] * self.cells[0] + cell[2] * self.cells[0] * self.cells[1]
  }

  #[inline]
  fn get(&self, cell: [usize; 3]) -> Option<u32> {
    let v = self.data[self.slot(cell)];
    (v != NO_VERTEX).then_some(v)
  }

  #[inline]
  fn set(&mut self, cell: [usize; 3], vertex: u32) {
    let slot = self.slot(cell);
    self.data[slot] = vertex;
  }
}

/// Mesh a node list end to end.
///
/// Builds a snapshot, the field and the grid, then extracts the surface. An
/// empty tree (or one without visible primitives) yields an empty mesh
/// without touching a grid.
pub fn mesh(nodes: &[Node], resolution: f32, blend_strength: f32) -> Mesh {
  let snapshot = SceneSnapshot::new(nodes);
  let mut resolver = TransformResolver::new(&snapshot);

  let Some(bounds) = estimate_bounds(&mut resolver, blend_strength) else {
    return Mesh::new();
  };
  let field = ScalarField::from_resolver(&mut resolver, blend_strength);
  let spec = GridSpec::from_bounds(&bounds, resolution);
  let grid = SampleGrid::sample(spec, &field);

  extract(&grid, &field)
}

/// Extract the isosurface from a sampled grid.
///
/// `field` must be the field the grid was sampled from; it is queried again
/// for winding correction.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "surface_nets::extract"))]
pub fn extract<F: DistanceField + ?Sized>(grid: &SampleGrid, field: &F) -> Mesh {
  let spec = *grid.spec();
  let mut mesh = Mesh::new();
  let mut cell_index = CellIndex::new(spec.cells);

  // =========================================================================
  // Pass 1: Vertices
  // =========================================================================
  let [nx, ny, nz] = spec.cells;
  for z in 0..nz {
    for y in 0..ny {
      for x in 0..nx {
        let samples: [f32; 8] = std::array::from_fn(|i| {
          let [ox, oy, oz] = CORNER_OFFSETS[i];
          grid.value(x + ox, y + oy, z + oz)
        });

        if corner_mask::is_homogeneous(corner_mask::build(&samples)) {
          continue;
        }
        let Some(local) = vertex_calc::compute_position(&samples) else {
          continue;
        };

        let origin = Vec3A::from(spec.corner_position(x, y, z));
        let position = origin + local * Vec3A::from(spec.step);

        cell_index.set([x, y, z], mesh.positions.len() as u32);
        mesh.positions.push(position.to_array());
      }
    }
  }

  // =========================================================================
  // Pass 2: Quads
  // =========================================================================
  let h = spec.gradient_step();
  let mut quad_list: Vec<Quad> = Vec::new();

  for z in 0..nz {
    for y in 0..ny {
      for x in 0..nx {
        let cell = [x, y, z];
        for axis in 0..3 {
          let Some(quad) = gather_quad(grid, &cell_index, cell, axis) else {
            continue;
          };

          let outward = quads::outward_normal(&quad, &mesh.positions, field, h);
          let quad = quads::orient(quad, &mesh.positions, outward);
          let mut tris = quads::triangulate(&quad, &mesh.positions, outward);
          quads::orient_triangles(&mut tris, &mesh.positions, field, h);

          mesh.indices.extend_from_slice(&tris);
          quad_list.push(quad);
        }
      }
    }
  }

  // =========================================================================
  // Pass 3: Edges + Normals
  // =========================================================================
  mesh.edges = quads::wireframe_edges(&quad_list);
  mesh.normals = normals::angle_weighted(&mesh.positions, &mesh.indices);
  mesh.recompute_bounds();

  #[cfg(feature = "tracing")]
  tracing::debug!(
    vertices = mesh.positions.len(),
    quads = quad_list.len(),
    edges = mesh.edges.len(),
    "surface extracted"
  );

  mesh
}

/// Quad around the edge leaving `cell`'s low corner along `axis`, ordered by
/// the sign direction along that edge.
#[inline]
fn gather_quad(
  grid: &SampleGrid,
  cell_index: &CellIndex,
  cell: [usize; 3],
  axis: usize,
) -> Option<Quad> {
  let u = (axis + 1) % 3;
  let v = (axis + 2) % 3;

  // The three neighbouring cells sit at -u and -v.
  if cell[u] == 0 || cell[v] == 0 {
    return None;
  }

  let [x, y, z] = cell;
  let mut end = cell;
  end[axis] += 1;
  let s0 = grid.value(x, y, z);
  let s1 = grid.value(end[0], end[1], end[2]);
  if (s0 < 0.0) == (s1 < 0.0) {
    return None;
  }

  let mut c_u = cell;
  c_u[u] -= 1;
  let mut c_v = cell;
  c_v[v] -= 1;
  let mut c_uv = c_u;
  c_uv[v] -= 1;

  let quad = [
    cell_index.get(cell)?,
    cell_index.get(c_u)?,
    cell_index.get(c_uv)?,
    cell_index.get(c_v)?,
  ];

  // Inside → outside along +axis: the surface faces +axis.
  if s0 < 0.0 {
    Some(quad)
  } else {
    Some(quads::reversed(quad))
  }
}
