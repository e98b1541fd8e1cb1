//! Finding the backing fields on a page.
//!
//! A page is a small element tree. Every `textarea` carrying the configured
//! class token becomes one backing field, seeded with the textarea's text.

use core_types::FieldId;
use input_core::normalize_newlines;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageNode {
    Document {
        children: Vec<PageNode>,
    },
    Element {
        id: u32,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<PageNode>,
    },
    Text {
        text: String,
    },
}

impl PageNode {
    pub fn document(children: Vec<PageNode>) -> Self {
        PageNode::Document { children }
    }

    pub fn element(id: u32, name: &str) -> Self {
        PageNode::Element {
            id,
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: &str) -> Self {
        PageNode::Text {
            text: text.to_string(),
        }
    }

    /// A `<textarea class="{class}">` holding `text`.
    pub fn textarea(id: u32, class: &str, text: &str) -> Self {
        PageNode::element(id, "textarea")
            .with_attr("class", Some(class))
            .with_children(vec![PageNode::text(text)])
    }

    pub fn with_attr(mut self, key: &str, value: Option<&str>) -> Self {
        if let PageNode::Element { attributes, .. } = &mut self {
            attributes.push((key.to_string(), value.map(str::to_string)));
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<PageNode>) -> Self {
        match &mut self {
            PageNode::Document { children } | PageNode::Element { children, .. } => {
                children.extend(new_children);
            }
            PageNode::Text { .. } => {}
        }
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            PageNode::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredField {
    pub field: FieldId,
    pub initial: String,
}

/// Every eligible textarea under `page`, in document order.
pub fn discover_fields(page: &PageNode, class_name: &str) -> Vec<DiscoveredField> {
    fn walk(node: &PageNode, class_name: &str, out: &mut Vec<DiscoveredField>) {
        match node {
            PageNode::Element {
                id, name, children, ..
            } if name.eq_ignore_ascii_case("textarea") => {
                if !node.has_class(class_name) {
                    return;
                }
                let mut raw = String::new();
                collect_text(children, &mut raw);
                let mut initial = normalize_newlines(&raw).into_owned();

                // Textarea parsing drops one leading newline.
                if initial.starts_with('\n') {
                    initial.remove(0);
                }

                out.push(DiscoveredField {
                    field: FieldId(*id),
                    initial,
                });
            }
            PageNode::Document { children } | PageNode::Element { children, .. } => {
                for c in children {
                    walk(c, class_name, out);
                }
            }
            PageNode::Text { .. } => {}
        }
    }

    let mut out = Vec::new();
    if class_name.split_ascii_whitespace().count() != 1 {
        log::warn!(target: "surface.discovery", "class name {class_name:?} is not a single token");
        return out;
    }
    walk(page, class_name, &mut out);
    log::debug!(target: "surface.discovery", "found {} backing fields", out.len());
    out
}

fn collect_text(nodes: &[PageNode], out: &mut String) {
    for n in nodes {
        match n {
            PageNode::Text { text } => out.push_str(text),
            PageNode::Element { children, .. } | PageNode::Document { children } => {
                collect_text(children, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marked_textareas_in_document_order() {
        let page = PageNode::document(vec![
            PageNode::element(1, "div").with_children(vec![
                PageNode::textarea(2, "gutterline", "first"),
                PageNode::textarea(3, "other", "skipped"),
            ]),
            PageNode::textarea(4, "wide gutterline dark", "second"),
        ]);

        let found = discover_fields(&page, "gutterline");
        assert_eq!(
            found,
            vec![
                DiscoveredField {
                    field: FieldId(2),
                    initial: "first".to_string()
                },
                DiscoveredField {
                    field: FieldId(4),
                    initial: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn class_token_must_match_exactly() {
        let page = PageNode::document(vec![
            PageNode::textarea(1, "gutterlines", ""),
            PageNode::textarea(2, "Gutterline", ""),
            PageNode::element(3, "div").with_attr("class", Some("gutterline")),
        ]);
        assert!(discover_fields(&page, "gutterline").is_empty());
    }

    #[test]
    fn tag_match_ignores_ascii_case() {
        let page = PageNode::document(vec![
            PageNode::element(9, "TEXTAREA")
                .with_attr("CLASS", Some("gutterline"))
                .with_children(vec![PageNode::text("x")]),
        ]);
        assert_eq!(discover_fields(&page, "gutterline").len(), 1);
    }

    #[test]
    fn initial_text_is_normalized_like_a_textarea() {
        let page = PageNode::document(vec![
            PageNode::textarea(1, "gutterline", "\r\nfn main() {\r\n}\r"),
            PageNode::textarea(2, "gutterline", "\n\nkeeps one"),
        ]);
        let found = discover_fields(&page, "gutterline");
        assert_eq!(found[0].initial, "fn main() {\n}\n");
        assert_eq!(found[1].initial, "\nkeeps one");
    }

    #[test]
    fn multi_token_class_name_finds_nothing() {
        let page = PageNode::document(vec![PageNode::textarea(1, "a b", "")]);
        assert!(discover_fields(&page, "a b").is_empty());
    }
}
