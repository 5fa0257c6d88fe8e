//! Trie node and the route trie operations

use crate::path::{self, Segment, Span};
use crate::InsertError;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Captured value spans, aligned with the matched node's parameter names
pub type Captures = SmallVec<[Span; 8]>;

/// One level of the routing tree
///
/// A node owns its literal children and at most one wildcard child. The
/// wildcard slot is positional: every `:name` route passing through this
/// node shares it, whatever the name.
#[derive(Debug)]
pub struct Node<H> {
    /// Literal children (key = exact segment text)
    children: HashMap<String, Node<H>>,
    /// Wildcard child (`:name`)
    wildcard: Option<Box<Node<H>>>,
    /// Handler if a route terminates here
    handler: Option<H>,
    /// Wildcard names from the root down to this node
    param_names: Vec<String>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            wildcard: None,
            handler: None,
            param_names: Vec::new(),
        }
    }
}

/// Lookup result of [`Node::at`]
#[derive(Debug, PartialEq)]
pub struct Match<'n, 'p, H> {
    /// Handler stored at the matched node
    pub handler: &'n H,
    /// Captured `(name, value)` pairs in declaration order
    pub params: Vec<(&'n str, &'p str)>,
}

impl<H> Node<H> {
    /// Create an empty root
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route pattern
    ///
    /// # Errors
    /// * [`InsertError::MalformedPath`] - the pattern has an empty,
    ///   non-trailing segment
    /// * [`InsertError::RouteConflict`] - a handler already terminates at
    ///   the node the pattern leads to
    ///
    /// # Example
    /// ```
    /// use sprig_trie::{InsertError, Node};
    ///
    /// let mut root = Node::new();
    /// root.insert("/accounts/:account", 1).unwrap();
    /// assert!(matches!(
    ///     root.insert("/accounts/:id", 2),
    ///     Err(InsertError::RouteConflict { .. })
    /// ));
    /// ```
    pub fn insert(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        let segments = path::parse_pattern(pattern)?;

        let mut names = Vec::new();
        let mut node = self;
        for segment in segments {
            node = match segment {
                Segment::Literal(literal) => node.children.entry(literal.to_string()).or_default(),
                Segment::Param(name) => {
                    names.push(name.to_string());
                    &mut **node.wildcard.get_or_insert_with(Default::default)
                }
            };
        }

        if node.handler.is_some() {
            return Err(InsertError::RouteConflict {
                pattern: pattern.to_string(),
            });
        }
        node.handler = Some(handler);
        node.param_names = names;
        Ok(())
    }

    /// Look up a path that was already split with [`path::split`]
    ///
    /// Values captured by wildcard segments are pushed to `values` as spans
    /// into `path`. Literal children always win over the wildcard child and
    /// a descent is never undone.
    pub fn lookup(&self, path: &str, segments: &[Span], values: &mut Captures) -> Option<&Node<H>> {
        let Some(last) = segments.len().checked_sub(1) else {
            return self.handler.as_ref().map(|_| self);
        };

        let mut node = self;
        for (i, span) in segments.iter().enumerate() {
            let is_last = i == last;

            if let Some(child) = node.children.get(span.slice(path)) {
                if !is_last {
                    node = child;
                    continue;
                }
                if child.handler.is_some() {
                    return Some(child);
                }
                // Literal hit without a handler: the wildcard sibling gets it
                let wildcard = node.wildcard.as_deref()?;
                if wildcard.handler.is_none() {
                    return None;
                }
                values.push(*span);
                return Some(wildcard);
            }

            let wildcard = node.wildcard.as_deref()?;
            values.push(*span);
            if is_last {
                return wildcard.handler.as_ref().map(|_| wildcard);
            }
            node = wildcard;
        }

        None
    }

    /// Split `path` and look it up
    ///
    /// # Example
    /// ```
    /// use sprig_trie::Node;
    ///
    /// let mut root = Node::new();
    /// root.insert("/:x/detail", "detail").unwrap();
    ///
    /// let m = root.at("/hello/detail").unwrap();
    /// assert_eq!(*m.handler, "detail");
    /// assert_eq!(m.params, vec![("x", "hello")]);
    /// ```
    pub fn at<'n, 'p>(&'n self, path: &'p str) -> Option<Match<'n, 'p, H>> {
        let mut segments = Vec::new();
        path::split(path, &mut segments);

        let mut values = Captures::new();
        let node = self.lookup(path, &segments, &mut values)?;
        let handler = node.handler.as_ref()?;
        let params = node
            .param_names
            .iter()
            .zip(values.iter())
            .map(|(name, span)| (name.as_str(), span.slice(path)))
            .collect();

        Some(Match { handler, params })
    }

    /// Literal child for `segment`
    pub fn child(&self, segment: &str) -> Option<&Node<H>> {
        self.children.get(segment)
    }

    /// Number of literal children
    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    /// The wildcard child, if any route put one here
    pub fn wildcard(&self) -> Option<&Node<H>> {
        self.wildcard.as_deref()
    }

    /// The handler of the route terminating here
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Wildcard names collected on the path to this node
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Check if no route passes through this node
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.wildcard.is_none() && self.handler.is_none()
    }
}
