// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Line-oriented XML writer.
//!
//! The contract, in full:
//!
//! * indentation is four spaces per level,
//! * empty elements self-close (`<tag … />`),
//! * comments are written verbatim,
//! * blank nodes render as empty lines,
//! * an element with at least two attributes whose inline rendering exceeds
//!   its width budget (120 columns by default, overridable per element) has
//!   its attributes written one per line at the next indent level.

use quick_xml::escape::escape;

use crate::emitter::xml::{XmlElement, XmlNode};

const INDENT: &str = "    ";
const DEFAULT_WRAP_BUDGET: usize = 120;

/// Render a document: XML declaration followed by the root element.
pub fn render_document(root: &XmlElement) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    write_element(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &XmlNode, level: usize) {
    match node {
        XmlNode::Element(element) => write_element(out, element, level),
        XmlNode::Comment(text) => {
            out.push_str(&INDENT.repeat(level));
            out.push_str("<!-- ");
            out.push_str(text);
            out.push_str(" -->\n");
        }
        XmlNode::Blank => out.push('\n'),
    }
}

fn write_element(out: &mut String, element: &XmlElement, level: usize) {
    let pad = INDENT.repeat(level);
    let inline_attributes = element
        .attributes
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"", escape(value.as_str())))
        .collect::<Vec<_>>()
        .join(" ");

    let empty = element.children.is_empty();
    let inline = if element.attributes.is_empty() {
        if empty {
            format!("{pad}<{} />", element.tag)
        } else {
            format!("{pad}<{}>", element.tag)
        }
    } else if empty {
        format!("{pad}<{} {inline_attributes} />", element.tag)
    } else {
        format!("{pad}<{} {inline_attributes}>", element.tag)
    };

    let budget = element.wrap_budget.unwrap_or(DEFAULT_WRAP_BUDGET);
    if element.attributes.len() >= 2 && inline.len() > budget {
        // One attribute per line at the next indent level.
        out.push_str(&pad);
        out.push('<');
        out.push_str(&element.tag);
        out.push('\n');
        let attribute_pad = INDENT.repeat(level + 1);
        for (key, value) in &element.attributes {
            out.push_str(&attribute_pad);
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push_str("\"\n");
        }
        out.push_str(&pad);
        if empty {
            out.push_str("/>\n");
        } else {
            out.push_str(">\n");
        }
    } else {
        out.push_str(&inline);
        out.push('\n');
    }

    if !empty {
        for child in &element.children {
            write_node(out, child, level + 1);
        }
        out.push_str(&pad);
        out.push_str("</");
        out.push_str(&element.tag);
        out.push_str(">\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::xml::XmlNode;

    #[test]
    fn empty_elements_self_close() {
        let element = XmlElement::new("provide-mesh").attr("name", "Fluid-Mesh");
        assert_eq!(
            render_document(&element),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<provide-mesh name=\"Fluid-Mesh\" />\n"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let element = XmlElement::new("sink").attr("filter", "%Severity% > debug");
        assert!(render_document(&element).contains("filter=\"%Severity% &gt; debug\""));
    }

    #[test]
    fn children_are_indented_four_spaces() {
        let root = XmlElement::new("mesh")
            .attr("name", "M")
            .child(XmlElement::new("use-data").attr("name", "D"));
        let rendered = render_document(&root);
        assert!(rendered.contains("\n    <use-data name=\"D\" />\n"));
        assert!(rendered.ends_with("</mesh>\n"));
    }

    #[test]
    fn blank_nodes_become_empty_lines() {
        let mut root = XmlElement::new("root");
        root.push(XmlElement::new("a"));
        root.blank();
        root.push(XmlElement::new("b"));
        let rendered = render_document(&root);
        assert!(rendered.contains("<a />\n\n    <b />"));
    }

    #[test]
    fn comments_are_preserved() {
        let mut root = XmlElement::new("root");
        root.children.push(XmlNode::Comment("keep me".to_string()));
        assert!(render_document(&root).contains("<!-- keep me -->"));
    }

    #[test]
    fn long_elements_wrap_one_attribute_per_line() {
        let element = XmlElement::new("mapping:nearest-neighbor")
            .attr("direction", "write")
            .attr("from", "An-Extraordinarily-Long-Source-Mesh-Name-Mesh")
            .attr("to", "An-Equally-Long-Target-Mesh-Name-For-Wrapping-Mesh")
            .attr("constraint", "conservative")
            .wrap_budget(100);
        let rendered = render_document(&element);
        assert!(rendered.contains("<mapping:nearest-neighbor\n"));
        assert!(rendered.contains("\n    direction=\"write\"\n"));
        assert!(rendered.contains("\n/>\n"));
    }

    #[test]
    fn short_elements_stay_inline() {
        let element = XmlElement::new("mapping:nearest-neighbor")
            .attr("direction", "write")
            .attr("from", "A-Mesh")
            .attr("to", "B-Mesh")
            .attr("constraint", "conservative")
            .wrap_budget(100);
        let rendered = render_document(&element);
        assert!(rendered.contains("<mapping:nearest-neighbor direction=\"write\" from=\"A-Mesh\" to=\"B-Mesh\" constraint=\"conservative\" />"));
    }
}
