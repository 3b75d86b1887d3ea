//! The node tree
//!
//! ## Ownership
//!
//! ```text
//! Node (handle) ──Rc──▶ NodeInner { name, state: RefCell<NodeState> }
//!                                          │
//!                 children: SmallVec<[Node; 4]>   (owning edge)
//!                 parent:   Option<Weak<NodeInner>> (back-reference)
//! ```
//!
//! A parent owns its children; the parent link never keeps anything alive.
//! Dropping the last handle to a detached subtree frees it.

use crate::attributes::{AttributeStore, Attributes};
use crate::error::{validate_name, NodeError, Result};
use crate::query::Query;
use crate::traverse::{self, Descendants};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct NodeState {
    parent: Option<Weak<NodeInner>>,
    children: SmallVec<[Node; 4]>, // Most descriptor elements have few children
    attributes: AttributeStore,
    text: Option<String>,
}

#[derive(Debug)]
struct NodeInner {
    name: String,
    state: RefCell<NodeState>,
}

/// Handle to a node in a document tree
///
/// Cloning the handle does not copy the node. Two handles compare equal
/// only when they point at the same node.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl Node {
    /// Create a root node
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self::unchecked(name))
    }

    /// Create a node and append it to `parent`'s children
    pub fn with_parent(name: impl Into<String>, parent: &Node) -> Result<Self> {
        let node = Self::new(name)?;
        parent.adopt(&node);
        Ok(node)
    }

    fn unchecked(name: String) -> Self {
        Node(Rc::new(NodeInner {
            name,
            state: RefCell::new(NodeState::default()),
        }))
    }

    fn adopt(&self, child: &Node) {
        child.0.state.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.state.borrow_mut().children.push(child.clone());
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Owning node, or `None` for a root
    pub fn parent(&self) -> Option<Node> {
        self.0
            .state
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Node)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Topmost ancestor (the document root); a root returns itself
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Number of ancestors above this node
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.parent();
        }
        depth
    }

    /// True when `ancestor` is a strict ancestor of this node
    pub fn is_descendant_of(&self, ancestor: &Node) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if node == *ancestor {
                return true;
            }
            current = node.parent();
        }
        false
    }


    /// Always append a new child, even when one with this name exists
    pub fn create(&self, name: impl Into<String>) -> Result<Node> {
        let child = Self::new(name)?;
        self.adopt(&child);
        tracing::trace!(parent = self.name(), child = child.name(), "created child");
        Ok(child)
    }

    /// Return the first child with this name, creating it if missing
    pub fn get_or_create(&self, name: impl Into<String>) -> Result<Node> {
        let name = name.into();
        match self.first_child(&name) {
            Some(existing) => Ok(existing),
            None => self.create(name),
        }
    }

    /// Direct children in insertion order
    ///
    /// The returned handles are live; the `Vec` itself is a copy of the
    /// child list at the time of the call.
    pub fn children(&self) -> Vec<Node> {
        self.0.state.borrow().children.to_vec()
    }

    pub fn child_count(&self) -> usize {
        self.0.state.borrow().children.len()
    }

    pub fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    /// Every direct child named `name`, in insertion order
    pub fn get(&self, name: &str) -> Vec<Node> {
        self.0
            .state
            .borrow()
            .children
            .iter()
            .filter(|child| child.name() == name)
            .cloned()
            .collect()
    }

    /// The only direct child named `name`
    ///
    /// Zero matches is `Ok(None)`; more than one is [`NodeError::AmbiguousMatch`].
    pub fn get_single(&self, name: &str) -> Result<Option<Node>> {
        let mut found = self.get(name);
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            count => Err(NodeError::AmbiguousMatch {
                name: name.to_string(),
                count,
            }),
        }
    }

    fn first_child(&self, name: &str) -> Option<Node> {
        self.0
            .state
            .borrow()
            .children
            .iter()
            .find(|child| child.name() == name)
            .cloned()
    }

    pub fn descendants(&self) -> Descendants {
        Descendants::new(self)
    }


    /// Set an attribute to the display form of `value`
    pub fn attribute(&self, name: impl Into<String>, value: impl fmt::Display) -> &Self {
        // `value` may render this node, so format it before borrowing
        let value = value.to_string();
        self.0.state.borrow_mut().attributes.set(name, value);
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0
            .state
            .borrow()
            .attributes
            .get(name)
            .map(str::to_string)
    }

    /// Read-only copy of all attributes
    pub fn attributes(&self) -> Attributes {
        self.0.state.borrow().attributes.snapshot()
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.0.state.borrow_mut().attributes.remove(name)
    }

    /// Set the text payload to the display form of `value`
    pub fn set_text(&self, value: impl fmt::Display) -> &Self {
        let value = value.to_string();
        self.0.state.borrow_mut().text = Some(value);
        self
    }

    /// Drop the text payload; `text()` returns `None` afterwards
    pub fn clear_text(&self) -> &Self {
        self.0.state.borrow_mut().text = None;
        self
    }

    pub fn text(&self) -> Option<String> {
        self.0.state.borrow().text.clone()
    }

    /// Text of the only direct child named `child_name`
    pub fn text_value(&self, child_name: &str) -> Result<Option<String>> {
        Ok(self.get_single(child_name)?.and_then(|child| child.text()))
    }

    /// Text of every direct child named `child_name`; children without text are skipped
    pub fn text_values(&self, child_name: &str) -> Vec<String> {
        self.0
            .state
            .borrow()
            .children
            .iter()
            .filter(|child| child.name() == child_name)
            .filter_map(|child| child.text())
            .collect()
    }


    /// Remove every direct child named `name`, returning the removed nodes
    pub fn remove(&self, name: &str) -> Result<Vec<Node>> {
        if name.is_empty() {
            return Err(NodeError::invalid(
                "name of nodes to remove must not be empty",
            ));
        }

        let removed: Vec<Node> = {
            let mut state = self.0.state.borrow_mut();
            let (removed, kept): (SmallVec<[Node; 4]>, SmallVec<[Node; 4]>) = state
                .children
                .drain(..)
                .partition(|child| child.name() == name);
            state.children = kept;
            removed.into_iter().collect()
        };

        for child in &removed {
            child.detach();
        }
        tracing::debug!(
            parent = self.name(),
            name,
            count = removed.len(),
            "removed children by name"
        );
        Ok(removed)
    }

    /// Remove `child` if it is a direct child of this node
    pub fn remove_child(&self, child: &Node) -> bool {
        let position = {
            let state = self.0.state.borrow();
            state.children.iter().position(|c| c == child)
        };

        match position {
            Some(index) => {
                self.0.state.borrow_mut().children.remove(index);
                child.detach();
                tracing::trace!(parent = self.name(), child = child.name(), "removed child");
                true
            }
            None => false,
        }
    }

    /// Remove the first direct child named `name`
    pub fn remove_single(&self, name: &str) -> Option<Node> {
        let child = self.first_child(name)?;
        self.remove_child(&child);
        Some(child)
    }

    /// Remove every node in this subtree owned by `query`
    ///
    /// Matches are collected in a full depth-first pass before anything is
    /// unlinked. This node itself is never removed.
    pub fn remove_matching(&self, query: &Query) -> Result<Vec<Node>> {
        let matched = self.get_matching(query)?;

        let mut removed = Vec::with_capacity(matched.len());
        for node in matched {
            if let Some(parent) = node.parent() {
                if parent.remove_child(&node) {
                    removed.push(node);
                }
            }
        }

        tracing::debug!(
            search_root = self.name(),
            query = %query,
            count = removed.len(),
            "removed nodes matched by query"
        );
        Ok(removed)
    }

    /// Every node in this subtree owned by `query`, in depth-first order
    pub fn get_matching(&self, query: &Query) -> Result<Vec<Node>> {
        if query.is_empty() {
            return Err(NodeError::invalid("query has no definitions"));
        }
        Ok(traverse::find(self, |node| query.owns(node, self)))
    }

    /// The only node in this subtree owned by `query`
    pub fn get_single_matching(&self, query: &Query) -> Result<Option<Node>> {
        let mut found = self.get_matching(query)?;
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            count => Err(NodeError::AmbiguousMatch {
                name: query.to_string(),
                count,
            }),
        }
    }

    fn detach(&self) {
        self.0.state.borrow_mut().parent = None;
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

/// `Node[name] children[n] attributes[{k=v}] text[..]`, text only when set
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.borrow();
        write!(
            f,
            "Node[{}] children[{}] attributes[{}]",
            self.name(),
            state.children.len(),
            state.attributes.snapshot()
        )?;
        if let Some(text) = &state.text {
            write!(f, " text[{}]", text)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.borrow();
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("attributes", &state.attributes)
            .field("text", &state.text)
            .field("children", &state.children)
            .finish()
    }
}

/// Lets an external serializer render the tree with any serde format
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let state = self.0.state.borrow();
        let mut s = serializer.serialize_struct("Node", 4)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("attributes", &state.attributes)?;
        s.serialize_field("text", &state.text)?;
        s.serialize_field("children", state.children.as_slice())?;
        s.end()
    }
}
