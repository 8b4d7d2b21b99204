//! Vertex adjacency from triangle indices.

use smallvec::SmallVec;

/// Neighbours of one vertex. Surface Nets vertices rarely exceed eight.
pub type Neighbours = SmallVec<[u32; 8]>;

/// Deduplicated neighbour set per vertex, built from triangle edges.
///
/// Indices outside `vertex_count` are ignored.
pub fn build_adjacency(vertex_count: usize, indices: &[u32]) -> Vec<Neighbours> {
  let mut adjacency = vec![Neighbours::new(); vertex_count];

  let mut link = |a: u32, b: u32| {
    if a == b || a as usize >= vertex_count || b as usize >= vertex_count {
      return;
    }
    let list = &mut adjacency[a as usize];
    if !list.contains(&b) {
      list.push(b);
    }
  };

  for tri in indices.chunks_exact(3) {
    let [i0, i1, i2] = [tri[0], tri[1], tri[2]];
    link(i0, i1);
    link(i0, i2);
    link(i1, i0);
    link(i1, i2);
    link(i2, i0);
    link(i2, i1);
  }

  adjacency
}

#[cfg(test)]
#[path = "adjacency_test.rs"]
mod adjacency_test;
