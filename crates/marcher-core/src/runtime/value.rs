//! Dynamic values crossing the script/native boundary.
//!
//! A `Value` is a type key plus a payload in one of three ownership modes:
//!
//!   Owned   : exclusive `Box<dyn Entity>`; dropping the value destroys the payload.
//!   Borrowed: `&'a dyn Entity` view into memory owned elsewhere (array elements).
//!   Shared  : `Rc<dyn Entity>` held jointly with an external owner (frame caches).
//!
//! Release is a move (`release(self)` or drop), so a value cannot be released twice
//! or used after release. Borrowed views cannot outlive their owner.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Result, RuntimeError};
use crate::types::entity::Entity;
use crate::types::key::TypeKey;
use crate::types::registry::TypeRegistry;

// ─── Live-count diagnostics ───────────────────────────────────────────────────

thread_local! {
    static LIVE_OWNED: Cell<usize> = const { Cell::new(0) };
}

/// Number of owned payloads currently alive on this thread.
pub fn live_owned() -> usize {
    LIVE_OWNED.with(|c| c.get())
}

/// Owned payload that keeps the thread's live count accurate.
struct OwnedBox(Box<dyn Entity>);

impl OwnedBox {
    fn new(b: Box<dyn Entity>) -> Self {
        LIVE_OWNED.with(|c| c.set(c.get() + 1));
        Self(b)
    }
}

impl Drop for OwnedBox {
    fn drop(&mut self) {
        LIVE_OWNED.with(|c| c.set(c.get().saturating_sub(1)));
    }
}

// ─── Value ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    Borrowed,
    Shared,
}

enum Storage<'a> {
    Owned(OwnedBox),
    Borrowed(&'a dyn Entity),
    Shared(Rc<dyn Entity>),
}

pub struct Value<'a> {
    key:     TypeKey,
    storage: Storage<'a>,
}

impl Value<'static> {
    pub fn owned(payload: Box<dyn Entity>) -> Self {
        Self { key: payload.type_key(), storage: Storage::Owned(OwnedBox::new(payload)) }
    }

    pub fn new<T: Entity>(payload: T) -> Self { Self::owned(Box::new(payload)) }

    pub fn num(v: f64) -> Self { Self::new(v) }
    pub fn int(v: i64) -> Self { Self::new(v) }
    pub fn bool(v: bool) -> Self { Self::new(v) }
    pub fn text(v: impl Into<String>) -> Self { Self::new(v.into()) }

    pub fn wrap_shared(payload: Rc<dyn Entity>) -> Self {
        Self { key: payload.type_key(), storage: Storage::Shared(payload) }
    }
}

impl<'a> Value<'a> {
    /// View into memory owned elsewhere. No copy, no ownership.
    pub fn wrap_borrowed(payload: &'a dyn Entity) -> Self {
        Self { key: payload.type_key(), storage: Storage::Borrowed(payload) }
    }

    pub fn type_key(&self) -> TypeKey { self.key }

    pub fn type_name(&self) -> &'static str { self.get().type_name() }

    pub fn ownership(&self) -> Ownership {
        match self.storage {
            Storage::Owned(_)    => Ownership::Owned,
            Storage::Borrowed(_) => Ownership::Borrowed,
            Storage::Shared(_)   => Ownership::Shared,
        }
    }

    pub fn get(&self) -> &dyn Entity {
        match &self.storage {
            Storage::Owned(b)    => b.0.as_ref(),
            Storage::Borrowed(r) => *r,
            Storage::Shared(rc)  => rc.as_ref(),
        }
    }

    /// Mutable access, only for owned payloads.
    pub fn get_mut(&mut self) -> Option<&mut dyn Entity> {
        match &mut self.storage {
            Storage::Owned(b) => Some(b.0.as_mut()),
            _ => None,
        }
    }

    pub fn is<T: Entity>(&self) -> bool { self.get().is::<T>() }

    pub fn downcast_ref<T: Entity>(&self) -> Result<&T> {
        let got = self.type_name();
        self.get().downcast_ref::<T>().ok_or_else(|| RuntimeError::type_mismatch(expected_name::<T>(), got))
    }

    /// Mutable typed access. Fails for borrowed and shared values as well as for
    /// type mismatches.
    pub fn downcast_mut<T: Entity>(&mut self) -> Result<&mut T> {
        let got = self.type_name();
        let ownership = self.ownership();
        let Some(payload) = self.get_mut() else {
            return Err(RuntimeError::type_mismatch(
                format!("owned {}", expected_name::<T>()),
                format!("{ownership:?} {got}").to_lowercase(),
            ));
        };
        payload.downcast_mut::<T>().ok_or_else(|| RuntimeError::type_mismatch(expected_name::<T>(), got))
    }

    /// Detach from any external owner, copying the payload if it is not already owned.
    pub fn into_owned(self) -> Value<'static> {
        match self.storage {
            Storage::Owned(b)    => Value { key: self.key, storage: Storage::Owned(b) },
            Storage::Borrowed(r) => Value::owned(r.clone_entity()),
            Storage::Shared(rc)  => Value::owned(rc.clone_entity()),
        }
    }

    /// Build a new owned value of type `key` from this one through the registry's
    /// coercion table.
    pub fn convert(&self, registry: &TypeRegistry, key: TypeKey) -> Result<Value<'static>> {
        let mut out = registry.create(key)?;
        let src = self.get();
        if let Some(dst) = out.get_mut() {
            registry.copy_convert(dst, src)?;
        }
        Ok(out)
    }

    // ── Primitive coercions ──────────────────────────────────────────────────

    pub fn to_number(&self) -> Result<f64> {
        self.get().to_number().ok_or_else(|| RuntimeError::type_mismatch("number", self.type_name()))
    }

    pub fn to_bool(&self) -> Result<bool> {
        self.get().to_bool().ok_or_else(|| RuntimeError::type_mismatch("bool", self.type_name()))
    }

    pub fn to_text(&self) -> Result<String> {
        self.get().to_text().ok_or_else(|| RuntimeError::type_mismatch("string", self.type_name()))
    }

    /// End this handle's claim on the payload: destroys owned payloads, decrements
    /// shared ones, and does nothing for borrowed views.
    pub fn release(self) {}
}

fn expected_name<T: Entity>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name())
            .field("ownership", &self.ownership())
            .field("payload", &self.get())
            .finish()
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get().to_text() {
            Some(s) => f.write_str(&s),
            None => write!(f, "{:?}", self.get()),
        }
    }
}

impl Clone for Value<'_> {
    /// Owned payloads are deep-copied; borrowed and shared handles are duplicated.
    fn clone(&self) -> Self {
        let storage = match &self.storage {
            Storage::Owned(b)    => Storage::Owned(OwnedBox::new(b.0.clone_entity())),
            Storage::Borrowed(r) => Storage::Borrowed(*r),
            Storage::Shared(rc)  => Storage::Shared(Rc::clone(rc)),
        };
        Self { key: self.key, storage }
    }
}
