//! Test modules relocated from implementation files.
//!
//! Shared fixtures live here: a scriptable fake [`Environment`] and a
//! small builder over the arena/interner pair so tests can assemble
//! expression trees without a front end.

use std::cell::Cell;

use reel_ir::{Expr, ExprArena, ExprId, Name, StringInterner};
use rustc_hash::FxHashMap;

use crate::{EvalError, EvalResult, Evaluator, InvokeError, Value};

mod call_tests;

type TestFn = Box<dyn Fn(&[Value]) -> Result<Value, EvalError>>;

/// Fake environment backed by hash maps.
///
/// Functions are registered per (name, arity); `invoke` reports
/// `NotFound` for unregistered pairs, which is what exercises the
/// calling-convention fallthrough. Every invocation attempt and every
/// read of `last` is recorded so tests can assert on dispatch order and
/// lookup counts.
#[derive(Default)]
pub(crate) struct TestEnv {
    vars: FxHashMap<Name, Value>,
    globals: FxHashMap<Name, Value>,
    functions: FxHashMap<(Name, usize), TestFn>,
    /// Arities attempted per invoke, in order.
    pub invocations: Vec<(Name, usize)>,
    /// How many times `last` has been read through `get_var`.
    pub last_reads: Cell<usize>,
}

impl TestEnv {
    pub fn new() -> Self {
        TestEnv::default()
    }

    pub fn with_var(mut self, name: Name, value: Value) -> Self {
        self.vars.insert(name, value);
        self
    }

    pub fn register(
        &mut self,
        name: Name,
        arity: usize,
        f: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) {
        self.functions.insert((name, arity), Box::new(f));
    }

    pub fn var(&self, name: Name) -> Option<&Value> {
        self.vars.get(&name)
    }

    pub fn global(&self, name: Name) -> Option<&Value> {
        self.globals.get(&name)
    }
}

impl crate::Environment for TestEnv {
    fn get_var(&self, name: Name) -> Option<Value> {
        if name == Name::LAST {
            self.last_reads.set(self.last_reads.get() + 1);
        }
        self.vars.get(&name).or_else(|| self.globals.get(&name)).cloned()
    }

    fn set_var(&mut self, name: Name, value: Value) {
        self.vars.insert(name, value);
    }

    fn set_global_var(&mut self, name: Name, value: Value) {
        self.globals.insert(name, value);
    }

    fn invoke(
        &mut self,
        name: Name,
        args: &[Value],
        _arg_names: &[Option<Name>],
    ) -> Result<Value, InvokeError> {
        self.invocations.push((name, args.len()));
        match self.functions.get(&(name, args.len())) {
            Some(f) => f(args).map_err(InvokeError::Raised),
            None => Err(InvokeError::NotFound),
        }
    }

    fn function_exists(&self, name: Name) -> bool {
        self.functions.keys().any(|(n, _)| *n == name)
    }

    fn splice(
        &mut self,
        a: &crate::Clip,
        b: &crate::Clip,
        aligned: bool,
    ) -> Result<crate::Clip, EvalError> {
        Ok(crate::Clip::new((a.clone(), b.clone(), aligned)))
    }
}

/// Arena/interner pair with shorthand constructors for common nodes.
pub(crate) struct ScriptBuilder {
    pub arena: ExprArena,
    pub interner: StringInterner,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        ScriptBuilder {
            arena: ExprArena::new(),
            interner: StringInterner::new(),
        }
    }

    pub fn name(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn push(&mut self, expr: Expr) -> ExprId {
        self.arena.alloc(expr)
    }

    pub fn int(&mut self, n: i64) -> ExprId {
        self.push(Expr::Int(n))
    }

    pub fn boolean(&mut self, b: bool) -> ExprId {
        self.push(Expr::Bool(b))
    }

    pub fn string(&mut self, text: &str) -> ExprId {
        let name = self.name(text);
        self.push(Expr::Str(name))
    }

    /// Chain statements into a right-leaning `Sequence`.
    pub fn sequence(&mut self, stmts: &[ExprId]) -> ExprId {
        let mut iter = stmts.iter().rev().copied();
        let Some(mut tail) = iter.next() else {
            return self.push(Expr::Undefined);
        };
        for first in iter {
            tail = self.push(Expr::Sequence {
                first,
                second: tail,
            });
        }
        tail
    }

    /// Wrap `body` in a `Root` and evaluate it.
    pub fn run(&mut self, body: ExprId, env: &mut TestEnv) -> EvalResult {
        let root = self.arena.alloc(Expr::Root { body });
        Evaluator::new(&self.arena, &self.interner).evaluate(root, env)
    }
}

/// A distinct clip handle carrying a label for debugging.
pub(crate) fn test_clip(label: &str) -> crate::Clip {
    crate::Clip::new(label.to_owned())
}
