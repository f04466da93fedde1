//! Evaluation frames and argument lists.
//!
//! The evaluator that owns expressions is external: the core only needs a `Frame`
//! that can evaluate slot `i` on demand. `Arguments` maps a call site's positional
//! arguments onto frame slots.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{Result, RuntimeError};
use crate::types::entity::Entity;
use crate::types::key::TypeKey;
use super::value::Value;

// ─── Frame ────────────────────────────────────────────────────────────────────

pub trait Frame {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Evaluate (or re-return the cached evaluation of) slot `slot`. The caller owns
    /// the returned handle.
    fn eval(&self, slot: usize) -> Result<Value<'_>>;
}

// ─── EvalFrame ────────────────────────────────────────────────────────────────

pub type Thunk = Box<dyn Fn() -> Result<Box<dyn Entity>>>;

struct Slot {
    expr:  Option<Thunk>,
    cache: OnceCell<Rc<dyn Entity>>,
    evals: Cell<usize>,
}

/// Reference frame: slots hold either ready values or thunks evaluated on first
/// access. Results are cached and handed out as shared values.
#[derive(Default)]
pub struct EvalFrame {
    slots: Vec<Slot>,
}

impl EvalFrame {
    pub fn new() -> Self { Self::default() }

    /// Append an already evaluated slot. Returns its index.
    pub fn push_value<T: Entity>(&mut self, v: T) -> usize {
        self.push_entity(Box::new(v))
    }

    pub fn push_entity(&mut self, v: Box<dyn Entity>) -> usize {
        let cache = OnceCell::new();
        let _ = cache.set(Rc::from(v));
        self.slots.push(Slot { expr: None, cache, evals: Cell::new(0) });
        self.slots.len() - 1
    }

    /// Append a slot evaluated on first access. Returns its index.
    pub fn push_lazy(&mut self, f: impl Fn() -> Result<Box<dyn Entity>> + 'static) -> usize {
        self.slots.push(Slot { expr: Some(Box::new(f)), cache: OnceCell::new(), evals: Cell::new(0) });
        self.slots.len() - 1
    }

    /// How many times slot `slot` was actually computed (0 for ready slots).
    pub fn evaluations(&self, slot: usize) -> usize {
        self.slots.get(slot).map_or(0, |s| s.evals.get())
    }

    /// Argument list addressing every slot of this frame in order.
    pub fn arguments(&self) -> Arguments {
        Arguments::positional(self.slots.len())
    }
}

impl Frame for EvalFrame {
    fn len(&self) -> usize { self.slots.len() }

    fn eval(&self, slot: usize) -> Result<Value<'_>> {
        let s = self.slots.get(slot).ok_or(RuntimeError::ArgumentIndex { index: slot, size: self.slots.len() })?;
        if let Some(v) = s.cache.get() {
            return Ok(Value::wrap_shared(Rc::clone(v)));
        }
        let Some(expr) = &s.expr else {
            return Err(RuntimeError::ArgumentIndex { index: slot, size: self.slots.len() });
        };
        tracing::trace!(slot, "evaluate frame slot");
        let v: Rc<dyn Entity> = Rc::from(expr()?);
        s.evals.set(s.evals.get() + 1);
        let v = s.cache.get_or_init(|| v);
        Ok(Value::wrap_shared(Rc::clone(v)))
    }
}

impl fmt::Debug for EvalFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| s.cache.get().map(|v| v.type_name()).unwrap_or("<lazy>")))
            .finish()
    }
}

// ─── Arguments ────────────────────────────────────────────────────────────────

/// One positional argument: the frame slot holding its expression and, optionally,
/// the type the call site declared for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    pub slot: usize,
    pub hint: Option<TypeKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    items: Vec<Argument>,
}

impl Arguments {
    pub fn new(items: Vec<Argument>) -> Self { Self { items } }

    /// Arguments `0..n` mapped to frame slots `0..n`, no type hints.
    pub fn positional(n: usize) -> Self {
        Self { items: (0..n).map(|slot| Argument { slot, hint: None }).collect() }
    }

    pub fn empty() -> Self { Self::default() }

    pub fn size(&self) -> usize { self.items.len() }

    pub fn items(&self) -> &[Argument] { &self.items }

    /// Evaluate argument `index` against `frame`. Ownership of the result moves to
    /// the caller.
    pub fn get<'f>(&self, index: usize, frame: &'f dyn Frame) -> Result<Value<'f>> {
        let arg = self.items.get(index).ok_or(RuntimeError::ArgumentIndex { index, size: self.items.len() })?;
        let v = frame.eval(arg.slot)?;
        if let Some(hint) = arg.hint {
            if v.type_key() != hint {
                return Err(RuntimeError::type_mismatch(hint.to_string(), v.type_name()));
            }
        }
        Ok(v)
    }
}
