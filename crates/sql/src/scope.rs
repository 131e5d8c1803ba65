//! Name-resolution scope of an OVER clause.
//!
//! The identifiers visible inside a windowed aggregate are the parameters of
//! the window's partition/order list plus everything visible in the parent
//! scope. The scope also answers monotonicity questions for the validator.

use sqlparser::ast::{Expr, Value};

/// Identifier resolution and monotonicity judgment at one validation scope.
pub trait ValidatorScope {
    /// Whether `name` is visible in this scope.
    fn resolve(&self, name: &str) -> bool;

    /// Whether `expr` is known to be monotonic when evaluated in this scope.
    fn is_monotonic(&self, expr: &Expr) -> bool;
}

/// Root of a scope chain; nothing is visible and nothing is monotonic.
#[derive(Debug, Default)]
pub struct EmptyScope;

impl ValidatorScope for EmptyScope {
    fn resolve(&self, _name: &str) -> bool {
        false
    }

    fn is_monotonic(&self, _expr: &Expr) -> bool {
        false
    }
}

/// A child namespace visible from an [`OverScope`], carrying the expressions
/// the validator has already established as monotonic for that relation.
#[derive(Debug, Clone)]
pub struct ScopeNamespace {
    pub name: String,
    pub monotonic_exprs: Vec<Expr>,
}

/// Scope layered over a parent for resolving names inside an OVER clause.
pub struct OverScope<'a> {
    parent: &'a dyn ValidatorScope,
    /// Partition/order parameter expressions of the window specification.
    window_exprs: Vec<Expr>,
    children: Vec<ScopeNamespace>,
}

impl<'a> OverScope<'a> {
    pub fn new(parent: &'a dyn ValidatorScope, window_exprs: Vec<Expr>) -> Self {
        Self {
            parent,
            window_exprs,
            children: Vec::new(),
        }
    }

    /// Register a child namespace (a relation in scope under the window).
    pub fn add_namespace(&mut self, ns: ScopeNamespace) {
        self.children.push(ns);
    }

    fn intrinsically_monotonic(expr: &Expr) -> bool {
        // Constants are trivially monotonic; nothing else is known without
        // namespace or parent evidence.
        matches!(expr, Expr::Value(Value::Number(..)) | Expr::Value(Value::SingleQuotedString(_)))
    }
}

impl ValidatorScope for OverScope<'_> {
    fn resolve(&self, name: &str) -> bool {
        let in_window = self.window_exprs.iter().any(|e| match e {
            Expr::Identifier(ident) => ident.value == name,
            _ => false,
        });
        in_window || self.parent.resolve(name)
    }

    /// First match wins, no further combination:
    /// 1. the expression is intrinsically monotonic;
    /// 2. with exactly one child namespace, the expression structurally equals
    ///    one of that namespace's recorded monotonic expressions;
    /// 3. the parent scope judges it monotonic.
    fn is_monotonic(&self, expr: &Expr) -> bool {
        if Self::intrinsically_monotonic(expr) {
            return true;
        }

        if self.children.len() == 1
            && self.children[0].monotonic_exprs.iter().any(|m| m == expr)
        {
            return true;
        }

        self.parent.is_monotonic(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::ast::Ident;

    fn col(name: &str) -> Expr {
        Expr::Identifier(Ident::new(name))
    }

    fn number(n: &str) -> Expr {
        Expr::Value(Value::Number(n.to_string(), false))
    }

    struct ParentWith(Vec<Expr>);

    impl ValidatorScope for ParentWith {
        fn resolve(&self, _name: &str) -> bool {
            true
        }

        fn is_monotonic(&self, expr: &Expr) -> bool {
            self.0.contains(expr)
        }
    }

    #[test]
    fn resolves_window_params_then_parent() {
        let parent = EmptyScope;
        let scope = OverScope::new(&parent, vec![col("empno"), col("deptno")]);
        assert!(scope.resolve("empno"));
        assert!(scope.resolve("deptno"));
        assert!(!scope.resolve("salary"));
    }

    #[test]
    fn literals_are_intrinsically_monotonic() {
        let parent = EmptyScope;
        let scope = OverScope::new(&parent, vec![]);
        assert!(scope.is_monotonic(&number("42")));
        assert!(!scope.is_monotonic(&col("empno")));
    }

    #[test]
    fn single_child_namespace_monotonic_exprs_match_structurally() {
        let parent = EmptyScope;
        let mut scope = OverScope::new(&parent, vec![]);
        scope.add_namespace(ScopeNamespace {
            name: "emp".to_string(),
            monotonic_exprs: vec![col("rowtime")],
        });
        assert!(scope.is_monotonic(&col("rowtime")));
        assert!(!scope.is_monotonic(&col("empno")));
    }

    #[test]
    fn namespace_evidence_ignored_with_two_children() {
        let parent = EmptyScope;
        let mut scope = OverScope::new(&parent, vec![]);
        for name in ["emp", "dept"] {
            scope.add_namespace(ScopeNamespace {
                name: name.to_string(),
                monotonic_exprs: vec![col("rowtime")],
            });
        }
        assert!(!scope.is_monotonic(&col("rowtime")));
    }

    #[test]
    fn falls_back_to_parent_judgment() {
        let parent = ParentWith(vec![col("ts")]);
        let scope = OverScope::new(&parent, vec![]);
        assert!(scope.is_monotonic(&col("ts")));
        assert!(!scope.is_monotonic(&col("other")));
    }

    #[test]
    fn parse_over_clause_smoke() {
        let stmts = crate::parse_sql(
            "SELECT avg(sal) OVER (PARTITION BY deptno ORDER BY empno) FROM emp",
        )
        .unwrap();
        assert_eq!(stmts.len(), 1);
    }
}
