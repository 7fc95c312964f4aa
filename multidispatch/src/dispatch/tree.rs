//! Per-operation dispatch trie.
//!
//! Nodes live in an arena addressed by index. Each node maps edge types to
//! child nodes; a signature is the path of its parameter types from the
//! root, and the node at the end of the path holds the leaf. Registration
//! walks edges by type identity, dispatch walks them by conformance.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use multidispatch_runtime::{Value, ValueKind};
use serde::Serialize;
use tracing::{debug, trace};

use super::error::DispatchError;
use super::resolver::{most_specific, Resolution};
use super::signature::Signature;
use crate::config::DispatchConfig;
use crate::types::{accepts, FullSampler, RandomSampler, Sampler, Type};

type NodeId = usize;
type LeafId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Default)]
struct TrieNode {
    /// Edges in insertion order
    edges: Vec<(Type, NodeId)>,
    index: HashMap<Type, NodeId>,
    leaf: Option<LeafId>,
}

/// A registered implementation at the end of a signature path
#[derive(Clone)]
pub struct Leaf<F> {
    pub implementation: F,
    pub signature: Signature,
    pub priority: i32,
}

impl<F> fmt::Debug for Leaf<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("signature", &self.signature)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Counters for resolution work done by one tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Calls answered from the resolution cache
    pub cache_hits: u64,
    /// Calls that walked the trie
    pub walks: u64,
}

/// Dispatch trie for one operation name
pub struct DispatchTree<F> {
    name: String,
    nodes: Vec<TrieNode>,
    leaves: Vec<Leaf<F>>,
    /// Resolved leaf per tuple of argument kinds
    cache: RefCell<HashMap<Vec<ValueKind>, LeafId>>,
    cache_enabled: bool,
    /// False once any edge type needs more than the value kind to decide
    kind_determined: bool,
    sampler: Option<RandomSampler>,
    stats: Cell<DispatchStats>,
}

impl<F> fmt::Debug for DispatchTree<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTree")
            .field("name", &self.name)
            .field("leaves", &self.leaves)
            .field("nodes", &self.nodes.len())
            .field("cache_enabled", &self.cache_enabled)
            .field("kind_determined", &self.kind_determined)
            .finish()
    }
}

impl<F> DispatchTree<F> {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, &DispatchConfig::default())
    }

    pub fn with_config(name: &str, config: &DispatchConfig) -> Self {
        Self {
            name: name.to_string(),
            nodes: vec![TrieNode::default()],
            leaves: Vec::new(),
            cache: RefCell::new(HashMap::new()),
            cache_enabled: config.cache,
            kind_determined: true,
            sampler: config.sampler(),
            stats: Cell::new(DispatchStats::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered leaves
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[Leaf<F>] {
        &self.leaves
    }

    /// Registered signatures with their priorities, in registration order
    pub fn signatures(&self) -> Vec<(Signature, i32)> {
        self.leaves
            .iter()
            .map(|leaf| (leaf.signature.clone(), leaf.priority))
            .collect()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats.get()
    }

    /// Number of memoized resolutions
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether calls are currently memoized by argument kinds
    pub fn uses_cache(&self) -> bool {
        self.cache_enabled && self.kind_determined
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    // ==================== Registration ====================

    /// Follow a signature path by type identity
    fn find_path(&self, signature: &Signature) -> Option<NodeId> {
        signature
            .types()
            .iter()
            .try_fold(ROOT, |node, ty| self.nodes[node].index.get(ty).copied())
    }

    /// Fail if the signature's path already ends in a leaf
    pub fn check(&self, signature: &Signature) -> Result<(), DispatchError> {
        match self.find_path(signature) {
            Some(node) if self.nodes[node].leaf.is_some() => {
                Err(DispatchError::RegistrationConflict {
                    name: self.name.clone(),
                    signature: signature.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Add one leaf
    pub fn insert(
        &mut self,
        signature: Signature,
        implementation: F,
        priority: i32,
    ) -> Result<(), DispatchError> {
        self.insert_all(vec![(signature, implementation, priority)])
    }

    /// Add several leaves, or none of them if any conflicts
    pub fn insert_all(&mut self, entries: Vec<(Signature, F, i32)>) -> Result<(), DispatchError> {
        for (i, (signature, _, _)) in entries.iter().enumerate() {
            self.check(signature)?;
            if entries[..i].iter().any(|(earlier, _, _)| earlier == signature) {
                return Err(DispatchError::RegistrationConflict {
                    name: self.name.clone(),
                    signature: signature.clone(),
                });
            }
        }
        for (signature, implementation, priority) in entries {
            self.attach(signature, implementation, priority);
        }
        // Earlier resolutions may no longer be the most specific
        if self.cache_len() > 0 {
            debug!(operation = %self.name, "clearing resolution cache");
        }
        self.clear_cache();
        Ok(())
    }

    fn attach(&mut self, signature: Signature, implementation: F, priority: i32) {
        let mut node = ROOT;
        for ty in signature.types() {
            node = match self.nodes[node].index.get(ty) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    let parent = &mut self.nodes[node];
                    parent.edges.push((ty.clone(), child));
                    parent.index.insert(ty.clone(), child);
                    child
                }
            };
        }
        self.kind_determined &= signature.is_kind_determined();
        debug!(
            operation = %self.name,
            signature = %signature,
            priority,
            "registered signature"
        );
        self.nodes[node].leaf = Some(self.leaves.len());
        self.leaves.push(Leaf {
            implementation,
            signature,
            priority,
        });
    }

    // ==================== Dispatch ====================

    fn sampler(&self) -> &dyn Sampler {
        match &self.sampler {
            Some(sampler) => sampler,
            None => &FullSampler,
        }
    }

    /// Leaves reachable by conformance along the argument values
    fn walk(&self, args: &[Value]) -> Vec<LeafId> {
        let sampler = self.sampler();
        let mut active = vec![ROOT];
        for (position, arg) in args.iter().enumerate() {
            let mut next = Vec::new();
            for &node in &active {
                for (ty, child) in &self.nodes[node].edges {
                    if accepts(ty, arg, sampler) {
                        next.push(*child);
                    }
                }
            }
            trace!(
                operation = %self.name,
                position,
                active = next.len(),
                "expanded argument"
            );
            if next.is_empty() {
                return Vec::new();
            }
            active = next;
        }
        active
            .into_iter()
            .filter_map(|node| self.nodes[node].leaf)
            .collect()
    }

    fn bump(&self, update: impl FnOnce(&mut DispatchStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Find the leaf that handles a call with these arguments
    pub fn resolve(&self, args: &[Value]) -> Result<&Leaf<F>, DispatchError> {
        let key: Option<Vec<ValueKind>> = self
            .uses_cache()
            .then(|| args.iter().map(Value::kind).collect());

        if let Some(key) = &key {
            if let Some(&leaf) = self.cache.borrow().get(key) {
                self.bump(|s| s.cache_hits += 1);
                trace!(operation = %self.name, "resolution cache hit");
                return Ok(&self.leaves[leaf]);
            }
        }

        self.bump(|s| s.walks += 1);
        let matches = self.walk(args);
        let leaf = match matches.as_slice() {
            [] => {
                return Err(DispatchError::NoMatchingSignature {
                    name: self.name.clone(),
                    arg_types: args.iter().map(Value::kind).collect(),
                })
            }
            [only] => *only,
            _ => self.choose(&matches, args)?,
        };

        if super::debug_enabled() {
            debug!(
                operation = %self.name,
                args = ?args.iter().map(|v| v.kind()).collect::<Vec<_>>(),
                candidates = matches.len(),
                selected = %self.leaves[leaf].signature,
                "dispatched"
            );
        }
        if let Some(key) = key {
            trace!(operation = %self.name, "resolution cache miss");
            self.cache.borrow_mut().insert(key, leaf);
        }
        Ok(&self.leaves[leaf])
    }

    fn choose(&self, matches: &[LeafId], args: &[Value]) -> Result<LeafId, DispatchError> {
        let candidates: Vec<(&Signature, i32)> = matches
            .iter()
            .map(|&id| (&self.leaves[id].signature, self.leaves[id].priority))
            .collect();
        match most_specific(&candidates) {
            Resolution::Unique(i) => Ok(matches[i]),
            Resolution::ByPriority(i) => {
                debug!(
                    operation = %self.name,
                    selected = %candidates[i].0,
                    priority = candidates[i].1,
                    "ambiguity resolved by priority"
                );
                Ok(matches[i])
            }
            Resolution::Ambiguous(pool) => Err(DispatchError::AmbiguousDispatch {
                name: self.name.clone(),
                arg_types: args.iter().map(Value::kind).collect(),
                candidates: pool
                    .into_iter()
                    .map(|i| (candidates[i].0.clone(), candidates[i].1))
                    .collect(),
            }),
        }
    }
}
