//! The vector view: a host-friendly tuple/list shadow of a cons-list
//! expression, used so the interaction driver can pattern-match state,
//! event, and image triples without walking the expression tree node
//! by node.
//!
//! A [`View`] is never stored inside an [`Expr`]; it is purely a
//! conversion target. [`vectorize`] flattens right-nested `cons`
//! spines into [`View::List`]; a tail that is not itself a list (or
//! `nil`) produces a 2-tuple [`View::Pair`] instead.

use std::fmt;

use galaxy_base::Int;

use crate::expr::{app, int, name, Expr, Kind};

/// The host-language shadow of a cons-list expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The empty list (`nil`).
    Nil,
    /// An integer value.
    Int(Int),
    /// A two-element, non-list-tailed pair `(a, b)`.
    Pair(Box<View>, Box<View>),
    /// A proper list `[v0, v1, ..., v_{k-1}]`.
    List(Vec<View>),
}

impl View {
    /// Convenience constructor for an integer view from any integer type.
    pub fn int(n: impl Into<Int>) -> View {
        View::Int(n.into())
    }

    /// Convenience constructor for a proper list view.
    pub fn list(items: impl IntoIterator<Item = View>) -> View {
        View::List(items.into_iter().collect())
    }

    /// Convenience constructor for a pair view.
    pub fn pair(a: View, b: View) -> View {
        View::Pair(Box::new(a), Box::new(b))
    }

    /// Borrows this view as a list's elements, if it is one.
    ///
    /// `Nil` counts as the empty list.
    pub fn as_list(&self) -> Option<&[View]> {
        match self {
            View::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows this view as a pair's two elements, if it is a 2-element
    /// structure of either shape (`Pair` or a `List` of length 2).
    pub fn as_pair(&self) -> Option<(&View, &View)> {
        match self {
            View::Pair(a, b) => Some((a, b)),
            View::List(items) if items.len() == 2 => Some((&items[0], &items[1])),
            _ => None,
        }
    }

    /// Splits off the first element of a cons-shaped view and the view
    /// of everything after it, regardless of whether this value
    /// vectorized to a flat [`View::List`] or a right-nested
    /// [`View::Pair`] chain. Used to walk driver protocol tuples like
    /// `(flag, (newState, (data, _)))` without caring which shape
    /// `vectorize` happened to produce for a given tail.
    pub fn uncons(&self) -> Option<(&View, View)> {
        match self {
            View::Pair(a, b) => Some((a, (**b).clone())),
            View::List(items) if !items.is_empty() => {
                let rest = if items.len() == 1 {
                    View::Nil
                } else {
                    View::List(items[1..].to_vec())
                };
                Some((&items[0], rest))
            }
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Nil => write!(f, "[]"),
            View::Int(n) => write!(f, "{}", n),
            View::Pair(a, b) => write!(f, "({}, {})", a, b),
            View::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Converts an already-value-shaped expression (`nil`, integers,
/// `cons`/`vec` pairs) into a [`View`].
///
/// Walks iteratively: the tail of a cons spine is followed in a loop
/// rather than recursion, so the thousands-deep lists Galaxy produces
/// do not overflow the stack. When a tail turns out not to be list-like
/// (neither `nil` nor another cons cell), the accumulated spine
/// collapses into a [`View::Pair`] of its one element and that tail,
/// exactly reproducing an improper pair.
pub fn vectorize(expr: &Expr) -> View {
    match &expr.kind {
        Kind::Int(n) => View::Int(n.clone()),
        Kind::Name(s) if &**s == "nil" => View::Nil,
        _ => {
            let mut items = Vec::new();
            let mut current = expr.clone();
            loop {
                if let Kind::Name(s) = &current.kind {
                    if &**s == "nil" {
                        return View::List(items);
                    }
                }
                match as_cons_pair(&current) {
                    Some((head, tail)) => {
                        items.push(vectorize(&head));
                        current = tail;
                    }
                    None => {
                        // Improper tail: collapse to a pair unless this
                        // is the very first element, in which case the
                        // expression itself wasn't a cons at all.
                        if items.is_empty() {
                            return vectorize_scalar(&current);
                        }
                        let last = items.pop().unwrap();
                        let tail_view = vectorize(&current);
                        // Re-nest remaining items as a list tailed by
                        // the pair (last, tail_view).
                        let mut result = View::Pair(Box::new(last), Box::new(tail_view));
                        while let Some(item) = items.pop() {
                            result = View::Pair(Box::new(item), Box::new(result));
                        }
                        return result;
                    }
                }
            }
        }
    }
}

fn vectorize_scalar(expr: &Expr) -> View {
    match &expr.kind {
        Kind::Int(n) => View::Int(n.clone()),
        Kind::Name(s) if &**s == "nil" => View::Nil,
        _ => unreachable!(
            "vectorize_scalar called on a non-value expression: {:?}",
            expr
        ),
    }
}

fn as_cons_pair(expr: &Expr) -> Option<(Expr, Expr)> {
    if let Kind::App(outer_left, tail) = &expr.kind {
        if let Kind::App(ctor, head) = &outer_left.kind {
            if let Kind::Name(s) = &ctor.kind {
                if &**s == "cons" || &**s == "vec" {
                    return Some((head.clone(), tail.clone()));
                }
            }
        }
    }
    None
}

/// Builds the right-nested `cons` expression a [`View`] denotes.
///
/// Lists build iteratively from the tail (`nil`) forward so that even a
/// several-thousand-element view produces its cons spine without
/// recursive stack growth.
pub fn unvectorize(view: &View) -> Expr {
    match view {
        View::Nil => name("nil"),
        View::Int(n) => int(n.clone()),
        View::Pair(a, b) => app(app(name("cons"), unvectorize(a)), unvectorize(b)),
        View::List(items) => {
            let mut tail = name("nil");
            for item in items.iter().rev() {
                tail = app(app(name("cons"), unvectorize(item)), tail);
            }
            tail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textual::{parse, unparse};

    #[test]
    fn vectorize_nil() {
        assert_eq!(vectorize(&name("nil")), View::Nil);
    }

    #[test]
    fn vectorize_integer() {
        assert_eq!(vectorize(&int(42)), View::int(42));
    }

    #[test]
    fn vectorize_proper_list() {
        let e = parse("ap ap cons 1 ap ap cons 2 nil").unwrap();
        assert_eq!(vectorize(&e), View::list([View::int(1), View::int(2)]));
    }

    #[test]
    fn vectorize_improper_pair() {
        let e = parse("ap ap cons 1 2").unwrap();
        assert_eq!(vectorize(&e), View::pair(View::int(1), View::int(2)));
    }

    #[test]
    fn unvectorize_list_then_vectorize_roundtrips() {
        let v = View::list([View::int(1), View::int(2), View::int(3)]);
        let e = unvectorize(&v);
        assert_eq!(vectorize(&e), v);
    }

    #[test]
    fn unvectorize_pair_then_vectorize_roundtrips() {
        let v = View::pair(View::int(7), View::Nil);
        let e = unvectorize(&v);
        assert_eq!(vectorize(&e), v);
    }

    #[test]
    fn unparse_unvectorize_vectorize_matches_unparse() {
        let source = "ap ap cons 1 ap ap cons 2 nil";
        let e = parse(source).unwrap();
        let roundtripped = unvectorize(&vectorize(&e));
        assert_eq!(unparse(&roundtripped), unparse(&e));
    }

    #[test]
    fn deep_list_vectorizes_without_overflowing_stack() {
        let v = View::list((0..20_000).map(View::int));
        let e = unvectorize(&v);
        let back = vectorize(&e);
        assert_eq!(back, v);
    }

    #[test]
    fn uncons_walks_a_flat_list() {
        let v = View::list([View::int(1), View::int(2), View::int(3)]);
        let (head, rest) = v.uncons().unwrap();
        assert_eq!(head, &View::int(1));
        assert_eq!(rest, View::list([View::int(2), View::int(3)]));
    }

    #[test]
    fn uncons_walks_a_nested_pair_chain() {
        let v = View::pair(View::int(0), View::pair(View::int(1), View::Nil));
        let (head, rest) = v.uncons().unwrap();
        assert_eq!(head, &View::int(0));
        assert_eq!(rest, View::pair(View::int(1), View::Nil));
    }
}
