//! Render S-expression trees as a Graphviz digraph.

use dot_writer::{Attributes, DotWriter, Shape};

use crate::data::{Atom, Node, SExpr};

struct GraphNode {
    name: String,
    shape: Shape,
    label: String,
}

/// Nodes and edges, collected before anything is written.
#[derive(Default)]
struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<(String, String)>,
}

impl Graph {
    fn add_node(&mut self, shape: Shape, label: &str) -> String {
        let name = format!("n{}", self.nodes.len());
        // Labels are written inside double quotes.
        let label = label.replace('\\', r"\\").replace('"', "\\\"");
        self.nodes.push(GraphNode {
            name: name.clone(),
            shape,
            label,
        });
        name
    }

    fn add(&mut self, expr: &SExpr) -> String {
        match &expr.node {
            Node::Atom(atom) => {
                let shape = match atom {
                    Atom::Symbol(_) => Shape::None,
                    Atom::Str(_) => Shape::Rectangle,
                    Atom::Int(_) | Atom::Float(_) => Shape::Circle,
                };
                self.add_node(shape, &atom.to_string())
            }
            Node::List(items) => self.add_children("()", items),
            Node::Vector(items) => self.add_children("[]", items),
            Node::Quoted(kind, inner) => {
                let node = self.add_node(Shape::Record, kind.prefix());
                let child = self.add(inner);
                self.edges.push((node.clone(), child));
                node
            }
        }
    }

    fn add_children(&mut self, label: &str, items: &[SExpr]) -> String {
        let node = self.add_node(Shape::Record, label);
        for item in items {
            let child = self.add(item);
            self.edges.push((node.clone(), child));
        }
        node
    }
}

/// Render the forms as one digraph; each top-level form is its own tree.
pub fn render_tree(forms: &[SExpr]) -> Vec<u8> {
    let mut graph = Graph::default();
    for form in forms {
        graph.add(form);
    }

    let mut outbuf = Vec::new();
    {
        let mut writer = DotWriter::from(&mut outbuf);
        let mut digraph = writer.digraph();
        for node in graph.nodes {
            digraph
                .node_named(&node.name)
                .set_shape(node.shape)
                .set_label(&node.label);
        }
        for (tail, head) in graph.edges {
            digraph.edge(tail, head);
        }
    }
    outbuf
}
