//! The object-safe trait every registered type implements.
//!
//! A `Value` stores its payload as `dyn Entity`, so anything constructible by name
//! through the registry (primitives, flat entities, arrays, scene shapes) goes through
//! this one interface. Coercions to primitives are opt-in: the defaults return `None`
//! and the value layer turns that into a type mismatch.

use std::any::Any;
use std::fmt;

use super::key::TypeKey;

pub trait Entity: Any + fmt::Debug {
    fn type_name(&self) -> &'static str;

    fn type_key(&self) -> TypeKey { TypeKey::of(self.type_name()) }

    fn clone_entity(&self) -> Box<dyn Entity>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Overwrite `self` with a copy of `src`. Returns false if `src` is a different type.
    fn assign_from(&mut self, src: &dyn Entity) -> bool;

    fn to_number(&self) -> Option<f64> { None }
    fn to_bool(&self) -> Option<bool> { None }
    fn to_text(&self) -> Option<String> { None }

    /// Flat entities expose their numeric fields in schema order.
    fn slots(&self) -> Option<Vec<f64>> { None }

    /// Returns false if the entity is not flat or `slots` has the wrong length.
    fn set_slots(&mut self, _slots: &[f64]) -> bool { false }
}

impl dyn Entity {
    pub fn is<T: Entity>(&self) -> bool { self.as_any().is::<T>() }

    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> { self.as_any().downcast_ref() }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> { self.as_any_mut().downcast_mut() }
}

/// Fixed-size numeric record declared by a compact schema string.
pub trait FlatEntity: Entity + Copy + Default {
    /// e.g. `"v3d = { f64 x; f64 y; f64 z; }"`
    const SCHEMA: &'static str;

    fn to_slots(&self) -> Vec<f64>;
    fn from_slots(slots: &[f64]) -> Self;
}

/// Implements the `Entity` boilerplate for a `Clone + Debug + 'static` type.
///
/// `flat` wires `slots`/`set_slots` through the type's `FlatEntity` impl; an optional
/// trailing block is spliced into the impl for coercion overrides.
macro_rules! entity {
    ($ty:ty, $name:expr) => { entity!($ty, $name, {}); };
    ($ty:ty, $name:expr, flat) => {
        entity!($ty, $name, {
            fn slots(&self) -> Option<Vec<f64>> {
                Some($crate::types::entity::FlatEntity::to_slots(self))
            }
            fn set_slots(&mut self, slots: &[f64]) -> bool {
                if slots.len() != $crate::types::entity::FlatEntity::to_slots(self).len() {
                    return false;
                }
                *self = <$ty as $crate::types::entity::FlatEntity>::from_slots(slots);
                true
            }
        });
    };
    ($ty:ty, $name:expr, { $($extra:tt)* }) => {
        impl $crate::types::entity::Entity for $ty {
            fn type_name(&self) -> &'static str { $name }
            fn clone_entity(&self) -> Box<dyn $crate::types::entity::Entity> { Box::new(self.clone()) }
            fn as_any(&self) -> &dyn ::std::any::Any { self }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any { self }
            fn assign_from(&mut self, src: &dyn $crate::types::entity::Entity) -> bool {
                match src.as_any().downcast_ref::<$ty>() {
                    Some(s) => { *self = s.clone(); true }
                    None => false,
                }
            }
            $($extra)*
        }
    };
}

pub(crate) use entity;

// ─── Primitives ───────────────────────────────────────────────────────────────

entity!(f64, "f64", {
    fn to_number(&self) -> Option<f64> { Some(*self) }
    fn to_bool(&self) -> Option<bool> { Some(*self != 0.0) }
    fn to_text(&self) -> Option<String> { Some(self.to_string()) }
});

entity!(i64, "i64", {
    fn to_number(&self) -> Option<f64> { Some(*self as f64) }
    fn to_bool(&self) -> Option<bool> { Some(*self != 0) }
    fn to_text(&self) -> Option<String> { Some(self.to_string()) }
});

entity!(bool, "bool", {
    fn to_number(&self) -> Option<f64> { Some(if *self { 1.0 } else { 0.0 }) }
    fn to_bool(&self) -> Option<bool> { Some(*self) }
    fn to_text(&self) -> Option<String> { Some(self.to_string()) }
});

entity!(String, "string", {
    fn to_text(&self) -> Option<String> { Some(self.clone()) }
});
