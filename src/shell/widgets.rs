use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A node of the shell's UI tree that a tour step can point at.
pub trait DescribableNode {
    fn style_class(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> Option<&str> {
        None
    }

    /// Text of the node's label child, for buttons and the like.
    fn label_text(&self) -> Option<&str> {
        None
    }

    /// Transformed position and size, in stage coordinates.
    fn bounds(&self) -> Rect;

    fn children(&self) -> Vec<&dyn DescribableNode>;

    fn matches(&self, key: &str) -> bool {
        self.style_class() == Some(key) || self.name() == Some(key) || self.label_text() == Some(key)
    }
}

/// Depth-first, pre-order search. A parent wins over its children and an
/// earlier sibling over a later one.
pub fn find_widget<'a>(root: &'a dyn DescribableNode, key: &str) -> Option<&'a dyn DescribableNode> {
    if root.matches(key) {
        return Some(root);
    }
    root.children()
        .into_iter()
        .find_map(|child| find_widget(child, key))
}

/// Serializable widget tree, used by scene files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub bounds: Rect,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WidgetNode>,
}

impl WidgetNode {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn with_style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = Some(class.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_child(mut self, child: WidgetNode) -> Self {
        self.children.push(child);
        self
    }

    /// Every node in pre-order, paired with the key it is best known by.
    pub fn flatten(&self) -> Vec<(String, Rect)> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect(&self, out: &mut Vec<(String, Rect)>) {
        let key = self
            .name
            .as_deref()
            .or(self.style_class.as_deref())
            .or(self.label.as_deref())
            .unwrap_or("widget");
        out.push((key.to_owned(), self.bounds));
        for child in &self.children {
            child.collect(out);
        }
    }
}

impl DescribableNode for WidgetNode {
    fn style_class(&self) -> Option<&str> {
        self.style_class.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn children(&self) -> Vec<&dyn DescribableNode> {
        self.children
            .iter()
            .map(|child| child as &dyn DescribableNode)
            .collect()
    }
}
