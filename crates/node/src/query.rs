//! Queries select nodes in a subtree by name
//!
//! A [`Query`] is a list of [`QueryDefinition`]s combined with OR, plus a
//! scope:
//!
//! - **Relative**: any node strictly below the search root whose name
//!   matches a definition.
//! - **Absolute**: definitions are anchored at the document root. The only
//!   eligible node is the document root itself, and only when the search
//!   starts there. An absolute query run on a subtree matches nothing.

use crate::node::Node;
use smallvec::SmallVec;
use std::fmt;

/// Where a query's matches may be found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryScope {
    #[default]
    Relative,
    Absolute,
}

/// Single name-matching clause
///
/// Matching is exact name equality. Pattern forms (wildcards, paths) would
/// be added here, behind [`QueryDefinition::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDefinition {
    target: String,
}

impl QueryDefinition {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn matches(&self, name: &str) -> bool {
        self.target == name
    }
}

impl From<&str> for QueryDefinition {
    fn from(target: &str) -> Self {
        Self::new(target)
    }
}

/// Set of definitions plus a scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    definitions: SmallVec<[QueryDefinition; 2]>,
    scope: QueryScope,
}

impl Query {
    /// `absolute` fixes the scope for the life of the query
    pub fn new(absolute: bool) -> Self {
        let scope = if absolute {
            QueryScope::Absolute
        } else {
            QueryScope::Relative
        };
        Self::with_scope(scope)
    }

    pub fn with_scope(scope: QueryScope) -> Self {
        Self {
            definitions: SmallVec::new(),
            scope,
        }
    }

    pub fn relative() -> Self {
        Self::with_scope(QueryScope::Relative)
    }

    pub fn absolute() -> Self {
        Self::with_scope(QueryScope::Absolute)
    }

    pub fn add_definition(&mut self, definition: QueryDefinition) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    /// Builder form of [`Query::add_definition`]
    pub fn with_definition(mut self, definition: impl Into<QueryDefinition>) -> Self {
        self.definitions.push(definition.into());
        self
    }

    pub fn definitions(&self) -> &[QueryDefinition] {
        &self.definitions
    }

    pub fn scope(&self) -> QueryScope {
        self.scope
    }

    pub fn is_absolute(&self) -> bool {
        self.scope == QueryScope::Absolute
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Does this query own `node` when searching from `search_root`?
    pub fn owns(&self, node: &Node, search_root: &Node) -> bool {
        let name_matches = self.definitions.iter().any(|def| def.matches(node.name()));
        if !name_matches {
            return false;
        }

        match self.scope {
            QueryScope::Relative => node.is_descendant_of(search_root),
            QueryScope::Absolute => search_root.is_root() && node == search_root,
        }
    }
}

/// `a|b` for relative queries, `/a|b` for absolute ones
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absolute() {
            f.write_str("/")?;
        }
        for (i, def) in self.definitions.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(def.target())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_flag() {
        assert_eq!(Query::new(false).scope(), QueryScope::Relative);
        assert_eq!(Query::new(true).scope(), QueryScope::Absolute);
        assert_eq!(Query::default().scope(), QueryScope::Relative);
    }

    #[test]
    fn test_definition_exact_match() {
        let def = QueryDefinition::new("servlet");
        assert!(def.matches("servlet"));
        assert!(!def.matches("servlet-mapping"));
        assert!(!def.matches("Servlet"));
    }

    #[test]
    fn test_definitions_keep_order() {
        let mut query = Query::relative();
        query
            .add_definition(QueryDefinition::new("b"))
            .add_definition(QueryDefinition::new("a"));

        let targets: Vec<&str> = query.definitions().iter().map(|d| d.target()).collect();
        assert_eq!(targets, vec!["b", "a"]);
    }

    #[test]
    fn test_relative_owns_descendants_only() {
        let root = Node::new("root").unwrap();
        let a = root.create("a").unwrap();
        let nested = a.create("a").unwrap();
        let query = Query::relative().with_definition("a");

        assert!(query.owns(&a, &root));
        assert!(query.owns(&nested, &root));
        assert!(query.owns(&nested, &a));
        assert!(!query.owns(&a, &a));
        assert!(!query.owns(&root, &root));
    }

    #[test]
    fn test_or_semantics() {
        let root = Node::new("root").unwrap();
        let a = root.create("a").unwrap();
        let b = root.create("b").unwrap();
        let c = root.create("c").unwrap();
        let query = Query::relative().with_definition("a").with_definition("c");

        assert!(query.owns(&a, &root));
        assert!(!query.owns(&b, &root));
        assert!(query.owns(&c, &root));
    }

    #[test]
    fn test_absolute_anchored_at_document_root() {
        let root = Node::new("root").unwrap();
        let child = root.create("child").unwrap();
        let grandchild = child.create("child").unwrap();

        let query = Query::absolute().with_definition("root");
        assert!(query.owns(&root, &root));

        let query = Query::absolute().with_definition("child");
        assert!(!query.owns(&child, &root));
        assert!(!query.owns(&child, &child));
        assert!(!query.owns(&grandchild, &child));
    }

    #[test]
    fn test_display() {
        let query = Query::absolute().with_definition("a").with_definition("b");
        assert_eq!(query.to_string(), "/a|b");
        assert_eq!(Query::relative().with_definition("x").to_string(), "x");
    }
}
