//! A minimal element tree standing in for the host's rendered preview.

use std::collections::{BTreeMap, BTreeSet};

/// One element of the rendered preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewElement {
    /// Tag name (`pre`, `code`, `button`, ...).
    pub tag: String,
    /// Class list.
    pub classes: BTreeSet<String>,
    /// Attributes other than `class`.
    pub attributes: BTreeMap<String, String>,
    /// Own text (not including children).
    pub text: String,
    /// Child elements, in order.
    pub children: Vec<PreviewElement>,
}

impl PreviewElement {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A `<pre><code>` pair holding `code`.
    pub fn code_block(code: &str) -> Self {
        Self::new("pre").with_child(Self::new("code").with_text(code))
    }

    /// Add a class (builder style).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    /// Set an attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the element text (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child (builder style).
    pub fn with_child(mut self, child: PreviewElement) -> Self {
        self.children.push(child);
        self
    }

    /// Check if the element has `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Add or remove `class`.
    pub fn set_class(&mut self, class: &str, present: bool) {
        if present {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    /// Attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// First direct child with tag `tag`.
    pub fn child(&self, tag: &str) -> Option<&PreviewElement> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Concatenated text of the element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Visit the element and every descendant, depth first, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut PreviewElement)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}
