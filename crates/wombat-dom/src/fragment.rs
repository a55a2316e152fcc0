//! Serializable subtree descriptions.
//!
//! A [`Fragment`] is the tree-library side of "insert this markup": a plain
//! value that can be instantiated into a [`DomTree`](crate::DomTree) any number
//! of times, each time yielding fresh nodes.
//!
//! The JSON shape is deliberately small:
//!
//! ```json
//! [
//!   { "tag": "ul", "attrs": { "class": "nav" }, "children": [
//!     { "tag": "li", "children": ["Home"] },
//!     { "comment": "more later" }
//!   ]}
//! ]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A detached description of an element, text or comment subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    /// A text node, written as a bare JSON string.
    Text(String),
    /// An element with attributes and children.
    Element {
        /// The element's local name.
        tag: String,
        /// Attribute name/value pairs.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
        /// Child fragments in order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Fragment>,
    },
    /// A comment node.
    Comment {
        /// The comment's data.
        comment: String,
    },
}

impl Fragment {
    /// An element fragment with no attributes or children.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// A text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A comment fragment.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment {
            comment: text.into(),
        }
    }

    /// Builder: set an attribute. No-op on text and comment fragments.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            let _ = attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Builder: append a child. No-op on text and comment fragments.
    #[must_use]
    pub fn child(mut self, child: Fragment) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Builder: append several children.
    #[must_use]
    pub fn children(self, new_children: impl IntoIterator<Item = Fragment>) -> Self {
        new_children.into_iter().fold(self, Self::child)
    }
}
