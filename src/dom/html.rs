use crate::dom::{Document, NodeId, NodeKind};

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

impl Document {
    /// Serializes the whole document, doctype included.
    pub fn to_html(&self) -> String {
        self.outer_html(self.root())
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            self.write_node(*child, out);
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Document) => {
                out.push_str("<!DOCTYPE html>");
                self.write_children(id, out);
            }
            Some(NodeKind::Fragment) => self.write_children(id, out),
            Some(NodeKind::Text(text)) => escape_text(text, out),
            Some(NodeKind::Element(element)) => {
                out.push('<');
                out.push_str(element.tag_name());
                if !element.classes().is_empty() {
                    out.push_str(" class=\"");
                    escape_attr(&element.classes().join(" "), out);
                    out.push('"');
                }
                for (name, value) in element.attrs() {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        escape_attr(value, out);
                        out.push('"');
                    }
                }
                out.push('>');
                self.write_children(id, out);
                out.push_str("</");
                out.push_str(element.tag_name());
                out.push('>');
            }
            None => {}
        }
    }
}
