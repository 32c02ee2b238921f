use std::collections::HashMap;

/// Undirected weighted graph over article ids. Edges carry a single f64
/// weight stored on both endpoints; there are no duplicate edges.
#[derive(Debug, Default)]
pub struct ArticleGraph {
    adjacency: HashMap<String, HashMap<String, f64>>,
}

impl ArticleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: adding an existing vertex keeps its edges.
    pub fn add_vertex(&mut self, id: &str) {
        self.adjacency.entry(id.to_string()).or_default();
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Set the weight of the undirected edge between a and b, creating missing
    /// vertices as needed. Overwrites any previous weight.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) {
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), weight);
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), weight);
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        self.adjacency.get(a).and_then(|nbrs| nbrs.get(b)).copied()
    }

    /// Neighbors of `id` with their edge weights, heaviest first. Ties
    /// order by neighbor id so the listing is deterministic.
    pub fn neighbors(&self, id: &str) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .adjacency
            .get(id)
            .map(|nbrs| nbrs.iter().map(|(n, w)| (n.clone(), *w)).collect())
            .unwrap_or_default();
        out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Drop every edge while keeping all vertices. Used before a full
    /// relationship rebuild.
    pub fn clear_edges(&mut self) {
        for nbrs in self.adjacency.values_mut() {
            nbrs.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_weight_is_symmetric() {
        let mut graph = ArticleGraph::new();
        graph.add_vertex("a");
        graph.add_vertex("b");
        graph.add_edge("a", "b", 1.0);
        assert_eq!(graph.edge_weight("a", "b"), Some(1.0));
        assert_eq!(graph.edge_weight("b", "a"), Some(1.0));
        assert_eq!(graph.edge_weight("a", "c"), None);
    }

    #[test]
    fn add_edge_overwrites_weight() {
        let mut graph = ArticleGraph::new();
        graph.add_edge("a", "b", 0.5);
        graph.add_edge("a", "b", 0.8);
        assert_eq!(graph.edge_weight("b", "a"), Some(0.8));
    }

    #[test]
    fn neighbors_sorted_by_weight_descending() {
        let mut graph = ArticleGraph::new();
        graph.add_edge("hub", "light", 0.5);
        graph.add_edge("hub", "heavy", 1.3);
        graph.add_edge("hub", "mid", 1.0);
        let ids: Vec<String> = graph.neighbors("hub").into_iter().map(|(n, _)| n).collect();
        assert_eq!(ids, vec!["heavy", "mid", "light"]);
        assert!(graph.neighbors("unknown").is_empty());
    }

    #[test]
    fn clear_edges_keeps_vertices() {
        let mut graph = ArticleGraph::new();
        graph.add_edge("a", "b", 1.0);
        graph.clear_edges();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_weight("a", "b"), None);
    }
}
