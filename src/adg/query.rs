//! Memoized path queries over a parsed rack document.
//!
//! Expressions are a small path language, not XPath:
//!
//! ```text
//! expr := ['.//'] step ('/' step)*
//! step := element-name | '*'
//! ```
//!
//! Without the `.//` prefix the first step matches direct children of the
//! context node; with it, any descendant in document order. Following steps
//! always match children. Names may contain dots (`MacroControls.3`).
//!
//! Results are cached per `(node, expression)` for the lifetime of one
//! analysis. The cache never changes results; [`QueryCache::disabled`]
//! evaluates every query afresh.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use roxmltree::{Node, NodeId};

/// Per-analysis query memo with hit/miss counters.
pub struct QueryCache<'a, 'input> {
    entries: RefCell<HashMap<NodeId, HashMap<String, Vec<Node<'a, 'input>>>>>,
    enabled: bool,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<'a, 'input> Default for QueryCache<'a, 'input> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, 'input> QueryCache<'a, 'input> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            enabled: true,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// A cache that never stores anything. Every query counts as a miss.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// All nodes matching `expr` relative to `node`, in document order.
    pub fn query(&self, node: Node<'a, 'input>, expr: &str) -> Vec<Node<'a, 'input>> {
        if self.enabled {
            if let Some(found) = self
                .entries
                .borrow()
                .get(&node.id())
                .and_then(|by_expr| by_expr.get(expr))
            {
                self.hits.set(self.hits.get() + 1);
                return found.clone();
            }
        }

        self.misses.set(self.misses.get() + 1);
        let result = evaluate(node, expr);
        if self.enabled {
            self.entries
                .borrow_mut()
                .entry(node.id())
                .or_default()
                .insert(expr.to_string(), result.clone());
        }
        result
    }

    /// First node matching `expr`.
    pub fn first(&self, node: Node<'a, 'input>, expr: &str) -> Option<Node<'a, 'input>> {
        self.query(node, expr).into_iter().next()
    }

    /// `@Value` of the first node matching `expr`.
    pub fn value(&self, node: Node<'a, 'input>, expr: &str) -> Option<&'a str> {
        self.first(node, expr).and_then(|n| n.attribute("Value"))
    }

    /// Trimmed non-empty `@Value` of the first node matching `expr`.
    pub fn non_empty_value(&self, node: Node<'a, 'input>, expr: &str) -> Option<&'a str> {
        self.value(node, expr)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    pub fn misses(&self) -> u64 {
        self.misses.get()
    }
}

fn evaluate<'a, 'input>(node: Node<'a, 'input>, expr: &str) -> Vec<Node<'a, 'input>> {
    let (descendant, path) = match expr.strip_prefix(".//") {
        Some(rest) => (true, rest),
        None => (false, expr),
    };
    let mut steps = path.split('/').filter(|s| !s.is_empty());
    let Some(first) = steps.next() else {
        return Vec::new();
    };

    let mut current: Vec<Node<'a, 'input>> = if descendant {
        node.descendants()
            .skip(1)
            .filter(|n| step_matches(n, first))
            .collect()
    } else {
        children_matching(node, first)
    };

    for step in steps {
        current = current
            .into_iter()
            .flat_map(|n| children_matching(n, step))
            .collect();
        if current.is_empty() {
            break;
        }
    }
    current
}

fn children_matching<'a, 'input>(node: Node<'a, 'input>, step: &str) -> Vec<Node<'a, 'input>> {
    node.children().filter(|n| step_matches(n, step)).collect()
}

fn step_matches(node: &Node, step: &str) -> bool {
    node.is_element() && (step == "*" || node.tag_name().name() == step)
}
