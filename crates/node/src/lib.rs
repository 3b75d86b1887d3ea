//! Descriptor Node Tree
//!
//! In-memory document tree for building deployment and configuration
//! descriptors before they are written out in some concrete format.
//!
//! ## Core Design
//!
//! ```text
//! Node (root) ─ create / get_or_create ─▶ Node ─▶ ...
//!      │                                   │
//!      └── attributes (ordered) ── text ───┘
//!
//! Query { definitions, scope } ──▶ Node::remove_matching ──▶ Vec<Node>
//! ```
//!
//! Children own their subtrees; parents are weak back-references. Handles
//! compare by identity.
//!
//! ```
//! use node::{Node, Query};
//!
//! let root = Node::new("web-app")?;
//! root.attribute("version", "3.0");
//! root.get_or_create("display-name")?.set_text("demo");
//! root.create("servlet")?;
//!
//! let removed = root.remove_matching(&Query::relative().with_definition("servlet"))?;
//! assert_eq!(removed.len(), 1);
//! assert_eq!(root.text_value("display-name")?.as_deref(), Some("demo"));
//! # Ok::<(), node::NodeError>(())
//! ```

pub mod attributes;
pub mod error;
pub mod node;
pub mod query;
pub mod snapshot;
pub mod traverse;

pub use attributes::{AttributeStore, Attributes};
pub use error::{NodeError, Result};
pub use node::Node;
pub use query::{Query, QueryDefinition, QueryScope};
pub use snapshot::{NodeSnapshot, SnapshotConfig};
pub use traverse::Descendants;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tree_building() {
        let root = Node::new("beans").unwrap();
        root.get_or_create("interceptors")
            .unwrap()
            .create("class")
            .unwrap()
            .set_text("org.example.Audit");

        let interceptors = root.get_single("interceptors").unwrap().unwrap();
        assert_eq!(interceptors.text_values("class"), vec!["org.example.Audit"]);
    }
}
