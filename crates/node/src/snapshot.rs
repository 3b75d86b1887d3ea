//! Owned, serializable copies of a subtree
//!
//! A [`NodeSnapshot`] is plain data: it can be stored, compared, sent to
//! JSON and turned back into a live tree with [`NodeSnapshot::into_node`].

use crate::attributes::AttributeStore;
use crate::error::Result;
use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Snapshot configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Levels below the captured node to include; `None` for the whole subtree
    pub max_depth: Option<usize>,
    pub include_text: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_text: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "AttributeStore::is_empty")]
    pub attributes: AttributeStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn capture(node: &Node) -> Self {
        Self::capture_with(node, &SnapshotConfig::default())
    }

    pub fn capture_with(node: &Node, config: &SnapshotConfig) -> Self {
        Self::capture_level(node, config, 0)
    }

    fn capture_level(node: &Node, config: &SnapshotConfig, depth: usize) -> Self {
        let mut attributes = AttributeStore::new();
        for (name, value) in node.attributes().iter() {
            attributes.set(name, value);
        }

        let descend = config.max_depth.map_or(true, |max| depth < max);
        let children = if descend {
            node.children()
                .iter()
                .map(|child| Self::capture_level(child, config, depth + 1))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            name: node.name().to_string(),
            attributes,
            text: if config.include_text { node.text() } else { None },
            children,
        }
    }

    /// Build a new, detached tree from this snapshot
    ///
    /// Names are validated again since the snapshot may come from outside.
    pub fn into_node(self) -> Result<Node> {
        let node = Node::new(self.name.clone())?;
        self.fill(&node)?;
        Ok(node)
    }

    fn fill(self, node: &Node) -> Result<()> {
        let attributes = self.attributes.snapshot();
        for (name, value) in attributes.iter() {
            node.attribute(name, value);
        }
        if let Some(text) = self.text {
            node.set_text(text);
        }
        for child in self.children {
            let created = node.create(child.name.clone())?;
            child.fill(&created)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Node {
    /// Owned copy of this subtree
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeError;

    fn descriptor() -> Node {
        let root = Node::new("web-app").unwrap();
        root.attribute("version", "3.0");
        let servlet = root.create("servlet").unwrap();
        servlet.create("servlet-name").unwrap().set_text("main");
        servlet.create("load-on-startup").unwrap().set_text(1);
        root
    }

    #[test]
    fn test_capture_and_rebuild() {
        let root = descriptor();
        let rebuilt = root.snapshot().into_node().unwrap();

        assert_ne!(rebuilt, root);
        assert_eq!(rebuilt.to_string(), root.to_string());
        let servlet = rebuilt.get_single("servlet").unwrap().unwrap();
        assert_eq!(servlet.text_value("servlet-name").unwrap().as_deref(), Some("main"));
        assert_eq!(servlet.parent(), Some(rebuilt));
    }

    #[test]
    fn test_max_depth() {
        let config = SnapshotConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let snapshot = NodeSnapshot::capture_with(&descriptor(), &config);

        assert_eq!(snapshot.children.len(), 1);
        assert!(snapshot.children[0].children.is_empty());
    }

    #[test]
    fn test_without_text() {
        let root = Node::new("root").unwrap();
        root.set_text("body");
        let config = SnapshotConfig {
            include_text: false,
            ..Default::default()
        };

        assert_eq!(NodeSnapshot::capture_with(&root, &config).text, None);
    }

    #[test]
    fn test_json() {
        let json = descriptor().snapshot().to_json().unwrap();
        let parsed = NodeSnapshot::from_json(&json).unwrap();

        assert_eq!(parsed.name, "web-app");
        assert_eq!(parsed.attributes.get("version"), Some("3.0"));
        assert_eq!(parsed.children[0].children[1].text.as_deref(), Some("1"));
    }

    #[test]
    fn test_invalid_name_rejected_on_rebuild() {
        let snapshot = NodeSnapshot::from_json(r#"{"name": "bad name"}"#).unwrap();
        assert!(matches!(
            snapshot.into_node(),
            Err(NodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            NodeSnapshot::from_json("{"),
            Err(NodeError::ParseError(_))
        ));
    }
}
