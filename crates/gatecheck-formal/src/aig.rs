//! And-Inverter Graph formula pool
//!
//! Every boolean formula built by the compiler is a literal into one [`Aig`].
//! A pool is created per query and shared by every circuit compiled for that
//! query, so primary inputs with the same name resolve to the same variable
//! while gate signals stay private to the circuit that defines them.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Literals and Nodes
// ============================================================================

/// A node in an And-Inverter Graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AigNodeId(pub u32);

/// An AIG literal (node reference with optional inversion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AigLit {
    /// Node ID
    pub node: AigNodeId,
    /// True if inverted
    pub inverted: bool,
}

impl AigLit {
    pub fn new(node: AigNodeId, inverted: bool) -> Self {
        Self { node, inverted }
    }

    pub fn positive(node: AigNodeId) -> Self {
        Self::new(node, false)
    }

    pub fn negative(node: AigNodeId) -> Self {
        Self::new(node, true)
    }

    pub fn invert(self) -> Self {
        Self::new(self.node, !self.inverted)
    }

    /// Literal for `self` if `value` is true, `!self` otherwise
    pub fn with_polarity(self, value: bool) -> Self {
        if value {
            self
        } else {
            self.invert()
        }
    }

    fn is_const(self) -> bool {
        self.node.0 == 0
    }
}

impl std::ops::Not for AigLit {
    type Output = AigLit;

    fn not(self) -> Self::Output {
        self.invert()
    }
}

/// Identifies the circuit that owns an internal signal within a shared pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope(pub u32);

/// Name of a boolean variable in the pool.
///
/// Primary inputs are keyed by bare name and unify across circuits; gate
/// signals are keyed by `(scope, name)` and never collide across scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarKey {
    Input(String),
    Internal { scope: Scope, name: String },
}

impl VarKey {
    pub fn input(name: impl Into<String>) -> Self {
        VarKey::Input(name.into())
    }

    pub fn internal(scope: Scope, name: impl Into<String>) -> Self {
        VarKey::Internal {
            scope,
            name: name.into(),
        }
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKey::Input(name) => f.write_str(name),
            VarKey::Internal { scope, name } => write!(f, "c{}::{}", scope.0, name),
        }
    }
}

/// AIG node type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    /// Constant false (node 0)
    False,
    /// Free boolean variable
    Var(VarKey),
    /// AND gate with two inputs
    And { left: AigLit, right: AigLit },
}

// ============================================================================
// Pool
// ============================================================================

/// And-Inverter Graph formula pool
///
/// Children of an AND node always have smaller ids than the node itself, so
/// the node vector is a topological order.
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: Vec<AigNode>,
    vars: IndexMap<VarKey, AigNodeId>,
    strash: HashMap<(AigLit, AigLit), AigNodeId>,
}

impl Aig {
    /// Create a new AIG with just the constant false node
    pub fn new() -> Self {
        Self {
            nodes: vec![AigNode::False],
            vars: IndexMap::new(),
            strash: HashMap::new(),
        }
    }

    pub fn false_lit(&self) -> AigLit {
        AigLit::positive(AigNodeId(0))
    }

    pub fn true_lit(&self) -> AigLit {
        AigLit::negative(AigNodeId(0))
    }

    pub fn constant(&self, value: bool) -> AigLit {
        self.false_lit().with_polarity(!value)
    }

    /// Declare a variable, returning the existing one if `key` is known
    pub fn declare(&mut self, key: VarKey) -> AigLit {
        if let Some(&id) = self.vars.get(&key) {
            return AigLit::positive(id);
        }
        let id = self.push(AigNode::Var(key.clone()));
        self.vars.insert(key, id);
        AigLit::positive(id)
    }

    /// Look up a declared variable
    pub fn var(&self, key: &VarKey) -> Option<AigLit> {
        self.vars.get(key).map(|&id| AigLit::positive(id))
    }

    /// All declared variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = (&VarKey, AigNodeId)> + '_ {
        self.vars.iter().map(|(k, &id)| (k, id))
    }

    pub fn node(&self, id: AigNodeId) -> &AigNode {
        &self.nodes[id.0 as usize]
    }

    pub fn nodes(&self) -> &[AigNode] {
        &self.nodes
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Get number of AND gates
    pub fn and_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, AigNode::And { .. }))
            .count()
    }

    fn push(&mut self, node: AigNode) -> AigNodeId {
        let id = AigNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Add an AND gate with constant folding and structural hashing
    pub fn add_and(&mut self, left: AigLit, right: AigLit) -> AigLit {
        // AND(x, false) = false
        if (left.is_const() && !left.inverted) || (right.is_const() && !right.inverted) {
            return self.false_lit();
        }
        // AND(x, true) = x
        if left.is_const() {
            return right;
        }
        if right.is_const() {
            return left;
        }
        // AND(x, x) = x
        if left == right {
            return left;
        }
        // AND(x, !x) = false
        if left.node == right.node {
            return self.false_lit();
        }

        let key = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        if let Some(&id) = self.strash.get(&key) {
            return AigLit::positive(id);
        }
        let id = self.push(AigNode::And {
            left: key.0,
            right: key.1,
        });
        self.strash.insert(key, id);
        AigLit::positive(id)
    }

    /// Add an OR gate (using De Morgan: a OR b = NOT(NOT a AND NOT b))
    pub fn add_or(&mut self, left: AigLit, right: AigLit) -> AigLit {
        self.add_and(left.invert(), right.invert()).invert()
    }

    /// Add an XOR gate
    pub fn add_xor(&mut self, a: AigLit, b: AigLit) -> AigLit {
        // XOR(a,b) = (a AND !b) OR (!a AND b)
        let a_and_not_b = self.add_and(a, b.invert());
        let not_a_and_b = self.add_and(a.invert(), b);
        self.add_or(a_and_not_b, not_a_and_b)
    }

    /// Equality, i.e. XNOR
    pub fn add_eq(&mut self, a: AigLit, b: AigLit) -> AigLit {
        self.add_xor(a, b).invert()
    }

    /// Conjunction of any number of literals; empty is true
    pub fn add_and_all(&mut self, lits: impl IntoIterator<Item = AigLit>) -> AigLit {
        lits.into_iter()
            .fold(self.true_lit(), |acc, lit| self.add_and(acc, lit))
    }

    /// Disjunction of any number of literals; empty is false
    pub fn add_or_all(&mut self, lits: impl IntoIterator<Item = AigLit>) -> AigLit {
        lits.into_iter()
            .fold(self.false_lit(), |acc, lit| self.add_or(acc, lit))
    }

    /// Evaluate `root` given a value for every variable node.
    ///
    /// Walks the nodes up to `root` once; since children precede parents no
    /// recursion is needed.
    pub fn eval(&self, root: AigLit, var_value: impl Fn(AigNodeId) -> bool) -> bool {
        let last = root.node.0 as usize;
        let mut values = Vec::with_capacity(last + 1);

        for (idx, node) in self.nodes[..=last].iter().enumerate() {
            let value = match node {
                AigNode::False => false,
                AigNode::Var(_) => var_value(AigNodeId(idx as u32)),
                AigNode::And { left, right } => {
                    let l = values[left.node.0 as usize] != left.inverted;
                    let r = values[right.node.0 as usize] != right.inverted;
                    l && r
                }
            };
            values.push(value);
        }

        values[last] != root.inverted
    }

    /// Mark every node reachable from `roots`
    pub fn cone(&self, roots: &[AigLit]) -> Vec<bool> {
        let mut needed = vec![false; self.nodes.len()];
        for root in roots {
            needed[root.node.0 as usize] = true;
        }
        for idx in (0..self.nodes.len()).rev() {
            if !needed[idx] {
                continue;
            }
            if let AigNode::And { left, right } = &self.nodes[idx] {
                needed[left.node.0 as usize] = true;
                needed[right.node.0 as usize] = true;
            }
        }
        needed
    }
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}
