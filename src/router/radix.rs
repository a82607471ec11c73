//! Compressed prefix tree (radix tree) used for path resolution
//!
//! Every edge carries a multi-byte prefix instead of a single character, so a
//! set of patterns like `/api/users` and `/api/users/admin` shares one `/api/users`
//! edge and stores only the diverging tails below it.
//!
//! ## Shape invariants
//!
//! - Sibling edges never share a leading byte. Insertion always splits an edge at
//!   the first divergence, and edge lookup stops at the first edge with any
//!   common prefix.
//! - After a mutation completes, no node below the root is value-less with fewer
//!   than two edges. Removal prunes empty leaves and merges single-child nodes
//!   back into their parent edge. The root is exempt and always persists.
//!
//! Keys are compared byte-for-byte; there is no normalization, case folding or
//! wildcard capture.
//!
//! ## Fallback resolution
//!
//! [`Radix::lookup_path`] resolves hierarchical paths. A registered key that
//! ends in `/` acts as the default for every unmatched descendant:
//!
//! ```rust
//! use radixmux::router::Radix;
//!
//! let mut tree = Radix::new();
//! tree.insert("/", 0);
//! tree.insert("/api", 1);
//! tree.insert("/api/users", 2);
//! tree.insert("/api/users/", 3);
//! tree.insert("/api/users/admin", 4);
//!
//! assert_eq!(tree.lookup_path("/api/users/admin123"), Some(&3));
//! assert_eq!(tree.lookup_path("/api/"), Some(&0));
//! assert_eq!(tree.lookup_path("/not-found"), Some(&0));
//! ```

use std::fmt;

/// Length of the common leading byte run of `a` and `b`.
fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

struct Edge<V> {
    prefix: Vec<u8>,
    node: Node<V>,
}

impl<V> Edge<V> {
    fn new(prefix: &[u8], value: V) -> Self {
        Self {
            prefix: prefix.to_vec(),
            node: Node {
                edges: Vec::new(),
                value: Some(value),
            },
        }
    }

    /// Split the edge at `at`: the edge keeps `prefix[..at]` and points to a new
    /// value-less node, which owns the original child under `prefix[at..]`.
    ///
    /// Splitting `computer` at 3 leaves `com` -> (new node) -> `puter` -> (old node).
    fn split(&mut self, at: usize) {
        let suffix = self.prefix.split_off(at);
        let child = std::mem::take(&mut self.node);
        self.node.edges.push(Edge {
            prefix: suffix,
            node: child,
        });
    }

    /// Fold a value-less child with exactly one edge into this edge.
    fn merge(&mut self) {
        if let Some(grandchild) = self.node.edges.pop() {
            self.prefix.extend_from_slice(&grandchild.prefix);
            self.node = grandchild.node;
        }
    }
}

struct Node<V> {
    edges: Vec<Edge<V>>,
    value: Option<V>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            value: None,
        }
    }
}

impl<V> Node<V> {
    /// Find the first edge sharing a non-empty prefix with `key`.
    /// Returns the edge index and the shared length.
    fn find(&self, key: &[u8]) -> Option<(usize, usize)> {
        self.edges.iter().enumerate().find_map(|(i, e)| {
            let eq = common_prefix(&e.prefix, key);
            (eq != 0).then_some((i, eq))
        })
    }

    fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        if key.is_empty() {
            return self.value.replace(value);
        }

        let Some((i, eq)) = self.find(key) else {
            self.edges.push(Edge::new(key, value));
            return None;
        };

        let edge = &mut self.edges[i];
        if eq == edge.prefix.len() {
            return edge.node.insert(&key[eq..], value);
        }

        edge.split(eq);
        if eq == key.len() {
            // key is a strict prefix of the old edge: the split point is the terminal
            edge.node.value = Some(value);
        } else {
            edge.node.edges.push(Edge::new(&key[eq..], value));
        }

        None
    }

    fn lookup(&self, mut key: &[u8]) -> Option<&V> {
        let mut node = self;
        while !key.is_empty() {
            let (i, eq) = node.find(key)?;
            let edge = &node.edges[i];
            if eq != edge.prefix.len() {
                return None;
            }
            node = &edge.node;
            key = &key[eq..];
        }
        node.value.as_ref()
    }

    fn lookup_path(&self, mut path: &[u8]) -> Option<&V> {
        let mut last_root = self;
        let mut node = self;

        while !path.is_empty() {
            let edge = match node.find(path) {
                Some((i, eq)) if eq == node.edges[i].prefix.len() => &node.edges[i],
                // partial or missing edge: nearest enclosing root answers
                _ => return last_root.value.as_ref(),
            };

            if edge.node.value.is_some() && edge.prefix.last() == Some(&b'/') {
                last_root = &edge.node;
            }

            path = &path[edge.prefix.len()..];
            node = &edge.node;
        }

        node.value.as_ref()
    }

    fn remove(&mut self, key: &[u8]) -> Option<V> {
        if key.is_empty() {
            return self.value.take();
        }

        let (i, eq) = self.find(key)?;
        if eq != self.edges[i].prefix.len() {
            return None;
        }

        let removed = self.edges[i].node.remove(&key[eq..])?;

        let edge = &mut self.edges[i];
        if edge.node.value.is_none() {
            match edge.node.edges.len() {
                0 => {
                    // sibling order carries no meaning, see `find`
                    self.edges.swap_remove(i);
                }
                1 => edge.merge(),
                _ => {}
            }
        }

        Some(removed)
    }

    fn dump(&self, out: &mut impl fmt::Write, pad: &str) -> fmt::Result
    where
        V: fmt::Debug,
    {
        let last = self.edges.len().saturating_sub(1);
        for (i, e) in self.edges.iter().enumerate() {
            let (branch, indent) = if i == last {
                ("└─── ", "     ")
            } else {
                ("├─── ", "│    ")
            };
            write!(out, "{pad}{branch}{}", String::from_utf8_lossy(&e.prefix))?;
            match &e.node.value {
                Some(v) => writeln!(out, " -> {v:?}")?,
                None => writeln!(out)?,
            }
            e.node.dump(out, &format!("{pad}{indent}"))?;
        }
        Ok(())
    }
}

/// Radix tree mapping string keys to values of type `V`
///
/// Not internally synchronized; [`crate::router::Router`] wraps it in a
/// shared/exclusive lock.
pub struct Radix<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Default for Radix<V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<V> Radix<V> {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys carrying a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register `value` under `key`.
    ///
    /// Returns the displaced value when `key` was already registered.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let previous = self.root.insert(key.as_bytes(), value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Insert `Some(value)` or delete on `None`.
    ///
    /// Mirrors registration APIs where an absent value means "unregister".
    /// Returns the previous value either way.
    pub fn store(&mut self, key: &str, value: Option<V>) -> Option<V> {
        match value {
            Some(value) => self.insert(key, value),
            None => self.remove(key),
        }
    }

    /// Exact-match lookup.
    ///
    /// A key that ends on a value-less interior node is not found.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&V> {
        self.root.lookup(key.as_bytes())
    }

    /// Hierarchical lookup with nearest-root fallback.
    ///
    /// An exact match wins. Otherwise the value of the deepest traversed node
    /// whose incoming edge ends in `/` is returned, falling back to the root's
    /// own value (registered under `""`).
    #[must_use]
    pub fn lookup_path(&self, path: &str) -> Option<&V> {
        self.root.lookup_path(path.as_bytes())
    }

    /// Remove `key`, returning its value if it was registered.
    ///
    /// Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.root.remove(key.as_bytes());
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Write a box-drawing rendering of the tree shape.
    pub fn dump(&self, out: &mut impl fmt::Write) -> fmt::Result
    where
        V: fmt::Debug,
    {
        if let Some(v) = &self.root.value {
            writeln!(out, "-> {v:?}")?;
        }
        self.root.dump(out, "")
    }

    /// [`Radix::dump`] into a fresh `String`.
    #[must_use]
    pub fn dump_string(&self) -> String
    where
        V: fmt::Debug,
    {
        let mut out = String::new();
        // fmt::Write for String never fails
        let _ = self.dump(&mut out);
        out
    }
}

impl<V: fmt::Debug> fmt::Debug for Radix<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Radix(len={})", self.len)?;
        self.dump(f)
    }
}
