//! Text and TOML renderings of session output

use itertools::Itertools;

use crate::application::{ApplicationError, ApplicationResult, Frame};
use crate::domain::{Layout, Tree};
use crate::tree_traits::TreeConvert;

/// ASCII outline plus the height line.
pub fn outline(tree: &Tree, frame: &Frame) -> String {
    format!(
        "{}height: {}",
        tree.to_term_tree(frame.highlight),
        frame.tree_height
    )
}

/// Node table followed by the edge list.
pub fn layout_table(layout: &Layout) -> String {
    if layout.is_empty() {
        return "no nodes".to_string();
    }
    let nodes = layout.nodes.iter().map(|node| {
        format!(
            "{:>5} key={:<6} x={:>8.1} y={:>7.1}",
            node.id.to_string(),
            node.key,
            node.x,
            node.y
        )
    });
    let edges = layout.edges.iter().map(|edge| {
        format!(
            "{} -> {}  ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            edge.parent, edge.child, edge.x1, edge.y1, edge.x2, edge.y2
        )
    });
    nodes.chain(edges).join("\n")
}

pub fn frame_toml(frame: &Frame) -> ApplicationResult<String> {
    toml::to_string(frame).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize frame".to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Session;

    #[test]
    fn given_empty_session_when_rendering_layout_then_placeholder() {
        assert_eq!(layout_table(&Session::default().layout()), "no nodes");
    }

    #[test]
    fn given_two_nodes_when_rendering_layout_then_rows_and_edge() {
        let mut session = Session::default();
        session.request_insert("10");
        session.request_insert("5");
        let table = layout_table(&session.layout());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("key=10"));
        assert!(lines[0].contains("x=   650.0"));
        assert!(lines[2].starts_with("#1 -> #2"));
        assert!(!table.ends_with('\n'));
    }

    #[test]
    fn given_frame_when_serialized_then_toml_has_status_and_nodes() {
        let mut session = Session::default();
        session.request_insert("7");
        let text = frame_toml(&session.frame()).expect("serializes");
        assert!(text.contains("tree_height = 0"));
        assert!(text.contains("tone = \"success\""));
        assert!(text.contains("[[nodes]]"));
        assert!(!text.contains("highlight"));
    }
}
