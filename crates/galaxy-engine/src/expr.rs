//! The expression tree: atoms and applications, with a write-once
//! evaluation slot per node.
//!
//! # Representation
//!
//! A node is either an [`Atom`] (an integer literal, a primitive name,
//! or a user-defined procedure reference — all just a name to this
//! layer) or an [`App`] of two child expressions. Every node carries an
//! `eval_slot`: a [`RefCell`] written at most once by the reducer,
//! holding the node's weak-head normal form once computed.
//!
//! Nodes are [`Rc`]-shared rather than arena-allocated. Substitution
//! under the `s` combinator duplicates an argument into two call sites
//! that must share one evaluation: reducing it from one site must be
//! observable from the other. Reference counting with interior
//! mutability gives that for free in a single-threaded interpreter; a
//! bump arena of owned values would require a second indirection to get
//! the same sharing.
//!
//! # Equality
//!
//! Two expressions are equal iff their preorder sequence of atom names
//! matches — applications are positional skeletons, irrelevant except
//! to align atoms. The eval slot never participates in equality.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use galaxy_base::Int;

/// A shared, mutably-cached expression node.
pub type Expr = Rc<Node>;

/// One node of the expression tree.
pub struct Node {
    pub kind: Kind,
    eval_slot: RefCell<Option<Expr>>,
}

/// The two node shapes: leaves and applications.
pub enum Kind {
    /// An integer literal.
    Int(Int),
    /// A primitive operator name, or a user-defined procedure reference
    /// (`galaxy`, `:1737`, ...). This layer does not distinguish them;
    /// the reducer does, via environment lookup.
    Name(Rc<str>),
    /// Function application: `left` applied to `right`.
    App(Expr, Expr),
}

impl Node {
    fn new(kind: Kind) -> Expr {
        Rc::new(Node {
            kind,
            eval_slot: RefCell::new(None),
        })
    }
}

/// Builds an integer atom.
pub fn int(n: impl Into<Int>) -> Expr {
    Node::new(Kind::Int(n.into()))
}

/// Builds a name atom (primitive or procedure reference).
pub fn name(s: impl AsRef<str>) -> Expr {
    Node::new(Kind::Name(Rc::from(s.as_ref())))
}

/// Builds an application node.
pub fn app(left: Expr, right: Expr) -> Expr {
    Node::new(Kind::App(left, right))
}

/// Reads the memoized weak-head normal form, if the reducer has already
/// computed one for this exact node.
pub fn eval_slot(expr: &Expr) -> Option<Expr> {
    expr.eval_slot.borrow().clone()
}

/// Writes the memoized weak-head normal form for this node.
///
/// Only the reducer calls this, and only once per node: a node whose
/// slot is already set is never re-evaluated (see
/// [`crate::reducer::evaluate`]).
pub fn set_eval_slot(expr: &Expr, normal: Expr) {
    *expr.eval_slot.borrow_mut() = Some(normal);
}

/// Iterative preorder traversal, yielding every node via `visit`.
///
/// Implemented with an explicit stack rather than recursion: Galaxy's
/// definitions contain cons lists thousands of nodes deep, which would
/// blow the call stack in a naive recursive walk.
pub fn preorder(root: &Expr, mut visit: impl FnMut(&Expr)) {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        visit(&node);
        if let Kind::App(left, right) = &node.kind {
            stack.push(right.clone());
            stack.push(left.clone());
        }
    }
}

/// Structural equality: preorder sequence of atom names must match.
///
/// Evaluation slots are ignored. Two applications compare equal only if
/// both their children compare equal in turn; the walk is iterative to
/// tolerate arbitrarily deep right-nested spines.
pub fn equal(a: &Expr, b: &Expr) -> bool {
    let mut stack = vec![(a.clone(), b.clone())];
    while let Some((x, y)) = stack.pop() {
        match (&x.kind, &y.kind) {
            (Kind::Int(m), Kind::Int(n)) => {
                if m != n {
                    return false;
                }
            }
            (Kind::Name(m), Kind::Name(n)) => {
                if m != n {
                    return false;
                }
            }
            (Kind::App(xl, xr), Kind::App(yl, yr)) => {
                stack.push((xl.clone(), yl.clone()));
                stack.push((xr.clone(), yr.clone()));
            }
            _ => return false,
        }
    }
    true
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (Kind::Int(m), Kind::Int(n)) => m == n,
            (Kind::Name(m), Kind::Name(n)) => m == n,
            (Kind::App(xl, xr), Kind::App(yl, yr)) => equal(xl, yl) && equal(xr, yr),
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Int(n) => write!(f, "{}", n),
            Kind::Name(s) => write!(f, "{}", s),
            Kind::App(l, r) => write!(f, "ap {:?} {:?}", l, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ignores_eval_slots() {
        let a = app(name("add"), int(1));
        let b = app(name("add"), int(1));
        assert!(equal(&a, &b));
        set_eval_slot(&a, int(2));
        assert!(equal(&a, &b));
    }

    #[test]
    fn equal_distinguishes_names_from_ints() {
        let a = name("1");
        let b = int(1);
        assert!(!equal(&a, &b));
    }

    #[test]
    fn eval_slot_roundtrip() {
        let e = int(5);
        assert!(eval_slot(&e).is_none());
        set_eval_slot(&e, int(5));
        assert!(eval_slot(&e).is_some());
    }

    #[test]
    fn preorder_visits_application_spine_left_to_right() {
        let tree = app(app(name("ap"), name("a")), name("b"));
        let mut names = Vec::new();
        preorder(&tree, |n| {
            if let Kind::Name(s) = &n.kind {
                names.push(s.to_string());
            }
        });
        assert_eq!(names, vec!["ap", "a", "b"]);
    }

    #[test]
    fn deeply_nested_application_does_not_overflow_stack() {
        let mut list = name("nil");
        for i in 0..20_000 {
            list = app(app(name("cons"), int(i)), list);
        }
        let mut count = 0;
        preorder(&list, |_| count += 1);
        assert!(count > 40_000);
    }
}
