use super::color::Rgb;
use super::data::GraphData;
use super::{EDGE_STRIDE, HEADER_LEN, NODE_STRIDE};

/// Encodes a graph into the flat wire format.
///
/// Layout: `[node_count, edge_count, nodes.., edges..]` where each node is
/// `[id, x, y, radius, r, g, b]` and each edge is
/// `[id, source, target, width, r, g, b]`, in input order.
///
/// Malformed colors are encoded as black; encoding never fails.
pub fn encode(graph: &GraphData) -> Vec<f32> {
    let len = HEADER_LEN + graph.nodes.len() * NODE_STRIDE + graph.edges.len() * EDGE_STRIDE;
    let mut buf = Vec::with_capacity(len);

    buf.push(graph.nodes.len() as f32);
    buf.push(graph.edges.len() as f32);

    for node in &graph.nodes {
        let a = &node.attributes;
        let c = Rgb::from_hex_or_black(&a.color);
        buf.extend_from_slice(&[node.id as f32, a.x, a.y, a.r, c.r, c.g, c.b]);
    }

    for edge in &graph.edges {
        let a = &edge.attributes;
        let c = Rgb::from_hex_or_black(&a.color);
        buf.extend_from_slice(&[
            edge.id as f32,
            edge.source as f32,
            edge.target as f32,
            a.width,
            c.r,
            c.g,
            c.b,
        ]);
    }

    debug_assert_eq!(buf.len(), len);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::data::{Edge, Node};
    use crate::graph::FlatGraph;

    #[test]
    fn single_red_node() {
        let g = GraphData {
            nodes: vec![Node::new(0, 0.0, 0.0, 5.0, "#ff0000")],
            edges: vec![],
        };
        assert_eq!(encode(&g), vec![1.0, 0.0, 0.0, 0.0, 0.0, 5.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_graph_is_header_only() {
        assert_eq!(encode(&GraphData::default()), vec![0.0, 0.0]);
    }

    #[test]
    fn nodes_then_edges_in_order() {
        let g = GraphData {
            nodes: vec![
                Node::new(0, 0.0, 0.0, 5.0, "#ff0000"),
                Node::new(1, 10.0, 10.0, 3.0, "#00ff00"),
            ],
            edges: vec![Edge::new(0, 0, 1, 1.0, "#0000ff")],
        };
        let buf = encode(&g);

        assert_eq!(buf.len(), 2 + 2 * 7 + 7);
        assert_eq!(&buf[..2], &[2.0, 1.0]);
        assert_eq!(&buf[9..16], &[1.0, 10.0, 10.0, 3.0, 0.0, 1.0, 0.0]);
        assert_eq!(&buf[16..], &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn malformed_color_encodes_black() {
        let g = GraphData {
            nodes: vec![Node::new(0, 1.0, 2.0, 3.0, "#zz0")],
            edges: vec![Edge::new(4, 0, 0, 2.0, "blue")],
        };
        let buf = encode(&g);
        assert_eq!(&buf[6..9], &[0.0, 0.0, 0.0]);
        assert_eq!(&buf[13..16], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn output_passes_wire_validation() {
        let g = GraphData {
            nodes: (0..5).map(|i| Node::new(i, i as f32, 0.0, 1.0, "#abc")).collect(),
            edges: (0..4).map(|i| Edge::new(i, i, i + 1, 0.5, "#fff")).collect(),
        };
        let buf = encode(&g);
        let flat = FlatGraph::parse(&buf).unwrap();
        assert_eq!(flat.node_count(), 5);
        assert_eq!(flat.edge_count(), 4);
        assert_eq!(flat.edges().last().unwrap().target, 4);
    }

    #[test]
    fn json_fixture_decodes_and_encodes() {
        let json = r##"{
            "nodes": [
                { "id": 0, "attributes": { "x": 0, "y": 0, "r": 5, "color": "#ff0000" } },
                { "id": 1, "attributes": { "x": 10, "y": 10, "r": 3, "color": "#00ff00" } }
            ],
            "edges": [
                { "id": 0, "source": 0, "target": 1, "attributes": { "width": 1, "color": "#0000ff" } }
            ]
        }"##;
        let g: GraphData = serde_json::from_str(json).unwrap();
        let buf = encode(&g);
        assert_eq!(buf[0], 2.0);
        assert_eq!(buf[1], 1.0);
        assert_eq!(buf[5], 5.0);
        assert!((buf[6] - 1.0).abs() < 1e-6);
    }
}
