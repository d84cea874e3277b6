//! Segment-indexed route tree.
//!
//! # Responsibilities
//! - Organize route patterns by path segment for sub-linear lookup
//! - Resolve ambiguity between static, regex, wildcard and catch-all segments
//! - Emit captured segment values together with the matched leaf
//! - Percent-decode path segments before comparing or capturing them
//!
//! # Precedence
//! At every node the children are tried in a fixed order:
//! literal, then regex (registration order), then wildcard, then catch-all.
//! A branch that dead-ends falls through to the next candidate, so the
//! result never depends on the order routes were added.
//!
//! The tree only encodes paths. Method separation lives in the router.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::routing::pattern::{segments, Pattern, Segment};

/// Identifier of a terminal node, shared by every route with the same path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(usize);

impl LeafId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaf-{}", self.0)
    }
}

/// Outcome of walking the tree with a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeMatch<'p> {
    /// The path reached a leaf. `captures` holds one value per capturing
    /// segment, in pattern order.
    Matched {
        leaf: LeafId,
        captures: Vec<Cow<'p, str>>,
    },
    NotMatched,
}

impl TreeMatch<'_> {
    pub fn leaf(&self) -> Option<LeafId> {
        match self {
            TreeMatch::Matched { leaf, .. } => Some(*leaf),
            TreeMatch::NotMatched => None,
        }
    }
}

#[derive(Debug)]
struct RegexChild {
    source: String,
    regex: Regex,
    node: Node,
}

#[derive(Debug, Default)]
struct Node {
    statics: HashMap<String, Node>,
    regexes: Vec<RegexChild>,
    wildcard: Option<Box<Node>>,
    catch_all: Option<LeafId>,
    leaf: Option<LeafId>,
}

impl Node {
    fn walk<'p>(
        &self,
        path: &[Cow<'p, str>],
        accept: &dyn Fn(LeafId) -> bool,
        captures: &mut Vec<Cow<'p, str>>,
    ) -> Option<LeafId> {
        let Some((head, rest)) = path.split_first() else {
            return self.leaf.filter(|leaf| accept(*leaf));
        };

        if let Some(child) = self.statics.get(&**head) {
            if let Some(leaf) = child.walk(rest, accept, captures) {
                return Some(leaf);
            }
        }

        for child in &self.regexes {
            if child.regex.is_match(head) {
                captures.push(head.clone());
                if let Some(leaf) = child.node.walk(rest, accept, captures) {
                    return Some(leaf);
                }
                captures.pop();
            }
        }

        if let Some(child) = &self.wildcard {
            captures.push(head.clone());
            if let Some(leaf) = child.walk(rest, accept, captures) {
                return Some(leaf);
            }
            captures.pop();
        }

        let leaf = self.catch_all.filter(|leaf| accept(*leaf))?;
        captures.push(Cow::Owned(path.join("/")));
        Some(leaf)
    }
}

/// Prefix tree over path segments.
///
/// Built with `&mut self` during setup, matched with `&self` afterwards.
#[derive(Debug, Default)]
pub struct RouteTree {
    root: Node,
    leaves: usize,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pattern, returning its leaf id.
    ///
    /// Patterns with the same shape (ignoring parameter names) return the
    /// same id, which lets routes for different methods share one leaf.
    pub fn add(&mut self, pattern: &Pattern) -> LeafId {
        let mut next = self.leaves;
        let mut node = &mut self.root;

        for segment in pattern.segments() {
            node = match segment {
                Segment::Static(text) => node.statics.entry(text.clone()).or_default(),
                Segment::Regex { source, regex, .. } => {
                    let pos = match node.regexes.iter().position(|c| &c.source == source) {
                        Some(pos) => pos,
                        None => {
                            node.regexes.push(RegexChild {
                                source: source.clone(),
                                regex: regex.clone(),
                                node: Node::default(),
                            });
                            node.regexes.len() - 1
                        }
                    };
                    &mut node.regexes[pos].node
                }
                Segment::Wildcard { .. } => node.wildcard.get_or_insert_with(Box::default),
                Segment::CatchAll { .. } => {
                    let leaf = *node.catch_all.get_or_insert_with(|| {
                        next += 1;
                        LeafId(next - 1)
                    });
                    self.leaves = next;
                    return leaf;
                }
            };
        }

        let leaf = *node.leaf.get_or_insert_with(|| {
            next += 1;
            LeafId(next - 1)
        });
        self.leaves = next;
        leaf
    }

    /// Match a request path against every leaf.
    pub fn match_path<'p>(&self, path: &'p str) -> TreeMatch<'p> {
        self.match_path_with(path, |_| true)
    }

    /// Match a request path, skipping leaves rejected by `accept`.
    ///
    /// A rejected leaf is treated like a dead end, so the walk falls through
    /// to the next candidate in precedence order. The router uses this to
    /// only consider leaves that have a route for the request method.
    ///
    /// Segments are percent-decoded after splitting, so an encoded `/` never
    /// changes segmentation. Invalid UTF-8 is replaced lossily.
    pub fn match_path_with<'p, F>(&self, path: &'p str, accept: F) -> TreeMatch<'p>
    where
        F: Fn(LeafId) -> bool,
    {
        let parts: Vec<Cow<'p, str>> = segments(path)
            .map(|s| percent_decode_str(s).decode_utf8_lossy())
            .collect();
        let mut captures = Vec::new();
        match self.root.walk(&parts, &accept, &mut captures) {
            Some(leaf) => TreeMatch::Matched { leaf, captures },
            None => TreeMatch::NotMatched,
        }
    }

    /// Number of distinct leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }
}
