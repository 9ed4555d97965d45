//! The symbol table: declared symbols, the scope stack, and frame
//! construction.
//!
//! This tracks the active `$v`, `$f`, `$e`, and `$d` statements at each point
//! of the single parsing pass, answers the activity queries the parser and
//! verifier need, and computes the frame (mandatory hypotheses plus mandatory
//! disjoint-variable pairs) when a `$a` or `$p` statement is reached.
//!
//! Rules of precedence worth noting:
//!
//! 1. Math symbols and labels are in separate namespaces but may not collide;
//!    the parser checks both directions at declaration time.
//!
//! 2. Constants and variables live forever once declared; a variable's
//!    *activity* ends with its enclosing block, and only active variables can
//!    appear in new statements.
//!
//! 3. Hypothesis labels deactivate with their block, but the label→statement
//!    mapping is monotonic: assertions constructed inside a block stay
//!    referenceable after it closes, with the hypotheses they captured.

use crate::nameck::Atom;
use crate::statement::{Frame, Hyp};
use crate::util::{HashMap, HashSet};
use itertools::Itertools;

/// Per-block bookkeeping.  One of these is live for the outer scope plus one
/// per unclosed `${`.
#[derive(Default, Debug)]
struct Scope {
    active_vars: HashSet<Atom>,
    /// Labels of active hypotheses, in declaration order.
    active_hyps: Vec<Atom>,
    disj_groups: Vec<Vec<Atom>>,
    /// Map from variable to the label of its active floating hypothesis.
    float_of: HashMap<Atom, Atom>,
}

/// All name and scope state for one verification session.
#[derive(Debug)]
pub struct ScopeSet {
    constants: HashSet<Atom>,
    variables: HashSet<Atom>,
    hypotheses: HashMap<Atom, Hyp>,
    assertions: HashMap<Atom, Frame>,
    scopes: Vec<Scope>,
}

impl Default for ScopeSet {
    fn default() -> Self {
        ScopeSet {
            constants: HashSet::default(),
            variables: HashSet::default(),
            hypotheses: HashMap::default(),
            assertions: HashMap::default(),
            scopes: vec![Scope::default()],
        }
    }
}

impl ScopeSet {
    fn top(&mut self) -> &mut Scope {
        self.scopes
            .last_mut()
            .expect("the outer scope is always open")
    }

    /// True between `${` and the matching `$}`.
    pub fn in_nested_scope(&self) -> bool {
        self.scopes.len() > 1
    }

    /// Enters a `${ $}` block.
    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Leaves a block, deactivating its variables and hypotheses.  Returns
    /// `false` for a `$}` with no matching `${`.
    pub fn close_scope(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    /// Is this symbol a declared constant?
    pub fn is_constant(&self, sym: Atom) -> bool {
        self.constants.contains(&sym)
    }

    /// Has this symbol ever been declared as a variable?
    pub fn is_variable(&self, sym: Atom) -> bool {
        self.variables.contains(&sym)
    }

    /// Declares a constant.  The parser has already checked for collisions.
    pub fn declare_constant(&mut self, sym: Atom) {
        self.constants.insert(sym);
    }

    /// Declares a variable and activates it in the current scope.
    pub fn declare_variable(&mut self, sym: Atom) {
        self.variables.insert(sym);
        self.top().active_vars.insert(sym);
    }

    /// Is this name the label of any hypothesis or assertion, active or not?
    pub fn label_used(&self, label: Atom) -> bool {
        self.hypotheses.contains_key(&label) || self.assertions.contains_key(&label)
    }

    /// The hypothesis with this label, if there is one.
    pub fn hypothesis(&self, label: Atom) -> Option<&Hyp> {
        self.hypotheses.get(&label)
    }

    /// The frame stored for this assertion label, if there is one.
    pub fn frame(&self, label: Atom) -> Option<&Frame> {
        self.assertions.get(&label)
    }

    /// Is this variable active in some open scope?
    pub fn is_active_variable(&self, sym: Atom) -> bool {
        self.scopes.iter().any(|sc| sc.active_vars.contains(&sym))
    }

    /// Is this label an active hypothesis?
    pub fn is_active_hyp(&self, label: Atom) -> bool {
        self.scopes.iter().any(|sc| sc.active_hyps.contains(&label))
    }

    /// Finds the active floating hypothesis for a variable.  Unique when
    /// present, since a second `$f` for an active variable is rejected.
    pub fn floating_hyp(&self, var: Atom) -> Option<Atom> {
        self.scopes.iter().find_map(|sc| sc.float_of.get(&var).copied())
    }

    /// Is there an active disjoint-variable restriction on two *different*
    /// variables?  A variable is never disjoint from itself.
    pub fn is_dvr(&self, var1: Atom, var2: Atom) -> bool {
        var1 != var2
            && self.scopes.iter().any(|sc| {
                sc.disj_groups
                    .iter()
                    .any(|group| group.contains(&var1) && group.contains(&var2))
            })
    }

    /// Appends a `$d` group to the current scope.  The parser has already
    /// checked activity, distinctness, and the two-variable minimum.
    pub fn add_disjoint_group(&mut self, vars: Vec<Atom>) {
        self.top().disj_groups.push(vars);
    }

    /// Records a hypothesis and activates it in the current scope.
    pub fn add_hypothesis(&mut self, label: Atom, hyp: Hyp) {
        if let Hyp::Floating { var, .. } = hyp {
            self.top().float_of.insert(var, label);
        }
        self.hypotheses.insert(label, hyp);
        self.top().active_hyps.push(label);
    }

    /// Constructs and stores the frame for a `$a` or `$p` statement: the
    /// mandatory hypotheses in canonical order and the mandatory
    /// disjoint-variable pairs.  Returns a copy for the caller (the proof
    /// checker needs it while the stored map stays borrowable).
    ///
    /// The traversal runs innermost scope first and within each scope in
    /// reverse declaration order, so that an essential hypothesis can make
    /// the floating hypotheses of its variables mandatory even when they
    /// were declared earlier; reversing the collected list restores
    /// declaration order.  Proof steps pop operands in exactly this order,
    /// so it is semantics, not presentation.
    pub fn build_frame(&mut self, label: Atom, expr: Vec<Atom>) -> Frame {
        let mut vars_used: HashSet<Atom> = expr
            .iter()
            .copied()
            .filter(|sym| self.variables.contains(sym))
            .collect();

        let mut mandatory = Vec::new();
        for scope in self.scopes.iter().rev() {
            for &hyp_label in scope.active_hyps.iter().rev() {
                match self.hypotheses[&hyp_label] {
                    Hyp::Floating { var, .. } => {
                        if vars_used.contains(&var) {
                            mandatory.push(hyp_label);
                        }
                    }
                    Hyp::Essential { ref expr } => {
                        mandatory.push(hyp_label);
                        vars_used.extend(
                            expr.iter()
                                .copied()
                                .filter(|sym| self.variables.contains(sym)),
                        );
                    }
                }
            }
        }
        mandatory.reverse();

        let mut pairs: HashSet<(Atom, Atom)> = HashSet::default();
        for scope in &self.scopes {
            for group in &scope.disj_groups {
                for (a, b) in group
                    .iter()
                    .copied()
                    .filter(|var| vars_used.contains(var))
                    .tuple_combinations()
                {
                    pairs.insert(if a < b { (a, b) } else { (b, a) });
                }
            }
        }
        let mut mandatory_dv: Vec<(Atom, Atom)> = pairs.into_iter().collect();
        mandatory_dv.sort_unstable();

        let frame = Frame {
            hypotheses: mandatory.into(),
            mandatory_dv: mandatory_dv.into(),
            target: expr.into(),
        };
        self.assertions.insert(label, frame.clone());
        frame
    }
}
