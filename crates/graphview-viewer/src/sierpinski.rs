//! Sierpinski triangle demo graph.

use graphview_engine::graph::{Edge, GraphData, Node};

const SIZE: f32 = 100.0;

/// Builds the outer triangle plus `depth` levels of midpoint subdivision.
///
/// Node ids equal their index; every subdivision adds three midpoints and
/// the three edges between them.
pub fn generate(depth: u32) -> GraphData {
    let mut g = GraphData::default();

    let corners = [
        (-SIZE, -SIZE / 2.0, "#ff0000"),
        (SIZE, -SIZE / 2.0, "#00ff00"),
        (0.0, SIZE, "#0000ff"),
    ];
    for (i, (x, y, color)) in corners.into_iter().enumerate() {
        g.nodes.push(Node::new(i as u32, x, y, 5.0, color));
    }
    for i in 0..3u32 {
        let id = g.edges.len() as u32;
        g.edges.push(Edge::new(id, i, (i + 1) % 3, 0.2, "#ffffff"));
    }

    subdivide(&mut g, [0, 1, 2], depth);
    g
}

fn subdivide(g: &mut GraphData, [a, b, c]: [u32; 3], level: u32) {
    if level == 0 {
        return;
    }

    let ab = midpoint(g, a, b);
    let bc = midpoint(g, b, c);
    let ca = midpoint(g, c, a);

    for (s, t) in [(ab, bc), (bc, ca), (ca, ab)] {
        let id = g.edges.len() as u32;
        g.edges.push(Edge::new(id, s, t, 0.1, "#666666"));
    }

    subdivide(g, [a, ab, ca], level - 1);
    subdivide(g, [ab, b, bc], level - 1);
    subdivide(g, [ca, bc, c], level - 1);
}

fn midpoint(g: &mut GraphData, p: u32, q: u32) -> u32 {
    let (p, q) = (&g.nodes[p as usize].attributes, &g.nodes[q as usize].attributes);
    let (x, y) = ((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
    let id = g.nodes.len() as u32;
    g.nodes.push(Node::new(id, x, y, 1.0, "#888888"));
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(depth: u32) -> usize {
        3 + 3 * (3usize.pow(depth) - 1) / 2
    }

    #[test]
    fn depth_zero_is_the_outer_triangle() {
        let g = generate(0);
        assert_eq!(g.nodes.len(), 3);
        assert_eq!(g.edges.len(), 3);
        assert_eq!(g.nodes[2].attributes.y, SIZE);
        assert_eq!(g.edges[2].source, 2);
        assert_eq!(g.edges[2].target, 0);
    }

    #[test]
    fn counts_grow_by_powers_of_three() {
        for depth in 0..5 {
            let g = generate(depth);
            assert_eq!(g.nodes.len(), expected_count(depth), "depth {depth}");
            assert_eq!(g.edges.len(), expected_count(depth), "depth {depth}");
        }
    }

    #[test]
    fn first_midpoint_and_ids_are_dense() {
        let g = generate(2);
        let m = &g.nodes[3].attributes;
        assert_eq!((m.x, m.y, m.r), (0.0, -SIZE / 2.0, 1.0));
        assert!(g.nodes.iter().enumerate().all(|(i, n)| n.id == i as u32));
        assert!(g.edges.iter().enumerate().all(|(i, e)| e.id == i as u32));
    }
}
