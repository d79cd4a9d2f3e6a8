use crate::graph::{EdgeWeights, Vertex, VertexId, Weight};

/// Depth-first search for a simple path of an exact total weight.
///
/// All weights must already be filled; since they are positive, a partial path heavier than the target is abandoned.
pub(crate) struct PathFinder {
    on_current_path: Vec<bool>,
}

impl PathFinder {
    pub(crate) fn new(num_vertices: usize) -> Self {
        Self { on_current_path: vec![false; num_vertices] }
    }

    /// Whether some non-self-intersecting path starting at `start` weighs exactly `target`.
    pub(crate) fn exists(&mut self, vertices: &[Vertex], weights: &EdgeWeights, start: VertexId, target: Weight) -> bool {
        let found = self.extend(vertices, weights, start, 0, u64::from(target));
        // a successful search returns without unwinding its markers
        self.on_current_path.fill(false);
        found
    }

    fn extend(&mut self, vertices: &[Vertex], weights: &EdgeWeights, v: VertexId, current: u64, target: u64) -> bool {
        if current >= target {
            return current == target;
        }

        debug_assert!(!self.on_current_path[v]);
        self.on_current_path[v] = true;

        for &neighbor in vertices[v].neighbors() {
            if !self.on_current_path[neighbor]
                && self.extend(vertices, weights, neighbor, current + u64::from(weights.get(v, neighbor)), target) {
                return true;
            }
        }

        self.on_current_path[v] = false;
        false
    }
}
