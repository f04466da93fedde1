//! Type registry: name / key → constructor + layout.
//!
//! Consumed by:
//!   • builtins that construct values (`create`, `construct`)
//!   • introspective construction from a script-level type name (`resolve_id`)
//!   • schema-driven field access and the coercion table (`get_field`, `copy_convert`)
//!
//! Adding a new constructible type = registering one TypeDesc here.

use std::collections::HashMap;

use crate::error::{Result, RuntimeError};
use crate::runtime::value::Value;
use super::entity::{Entity, FlatEntity};
use super::key::TypeKey;
use super::schema::{FieldKind, FieldLayout, Layout, Schema, SchemaBody, NUM};

// ─── Function pointer aliases ─────────────────────────────────────────────────

/// Allocate a default-initialized instance.
pub type Constructor = fn() -> Box<dyn Entity>;

/// Write `src` into pre-allocated `dst`, converting if the pair is supported.
pub type CopyTypedFn = fn(&mut dyn Entity, &dyn Entity) -> Result<()>;

// ─── Descriptor ───────────────────────────────────────────────────────────────

pub struct TypeDesc {
    pub name:       String,
    pub key:        TypeKey,
    pub construct:  Constructor,
    pub layout:     Layout,
    /// None means identity copies only.
    pub copy_typed: Option<CopyTypedFn>,
}

// ─── Registry ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<TypeKey, TypeDesc>,
    /// Registration order, for listing.
    order: Vec<TypeKey>,
}

impl TypeRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, name: &str, construct: Constructor, layout: Layout) -> Result<TypeKey> {
        let key = TypeKey::of(name);
        if let Some(existing) = self.types.get(&key) {
            let err = if existing.name == name {
                RuntimeError::DuplicateType(name.to_string())
            } else {
                RuntimeError::KeyCollision { name: name.to_string(), existing: existing.name.clone(), key }
            };
            tracing::warn!(%err, "type registration rejected");
            return Err(err);
        }
        tracing::debug!(name, %key, flat = layout.is_flat(), "register type");
        self.types.insert(key, TypeDesc { name: name.to_string(), key, construct, layout, copy_typed: None });
        self.order.push(key);
        Ok(key)
    }

    /// Register a Rust type with no field schema.
    pub fn register_opaque<T: Entity + Default>(&mut self, name: &str) -> Result<TypeKey> {
        self.register(name, || Box::new(T::default()), Layout::opaque(size_of::<T>()))
    }

    /// Parse `schema_src`, resolve nested field types against already registered flat
    /// types, and register the result.
    pub fn register_flat(&mut self, schema_src: &str, construct: Constructor, size: usize) -> Result<TypeKey> {
        let schema = Schema::parse(schema_src)?;
        let fields = match &schema.body {
            SchemaBody::Alias(target) => {
                let desc = self.flat_desc(target, schema_src)?;
                desc.layout.fields.clone()
            }
            SchemaBody::Fields(decls) => {
                let mut fields = Vec::with_capacity(decls.len());
                let mut offset = 0;
                for decl in decls {
                    let (kind, width) = if decl.ty == NUM {
                        (FieldKind::Num, 1)
                    } else {
                        let desc = self.flat_desc(&decl.ty, schema_src)?;
                        (FieldKind::Entity(desc.key), desc.layout.slots())
                    };
                    fields.push(FieldLayout { name: decl.name.clone(), kind, offset, width });
                    offset += width;
                }
                fields
            }
        };
        self.register(&schema.name, construct, Layout { size, fields })
    }

    /// Register a `FlatEntity` through its declared schema.
    pub fn register_entity<T: FlatEntity>(&mut self) -> Result<TypeKey> {
        let key = self.register_flat(T::SCHEMA, || Box::new(T::default()), size_of::<T>())?;
        let probe = T::default();
        let declared = self.layout_of(key).map(|l| l.slots()).unwrap_or_default();
        if probe.to_slots().len() != declared {
            let err = RuntimeError::Schema {
                source_text: T::SCHEMA.to_string(),
                message: format!("schema declares {declared} slots, type provides {}", probe.to_slots().len()),
            };
            self.unregister(key);
            return Err(err);
        }
        Ok(key)
    }

    /// Attach a conversion routine to an already registered type.
    pub fn set_copy_typed(&mut self, key: TypeKey, f: CopyTypedFn) -> Result<()> {
        let desc = self.types.get_mut(&key).ok_or(RuntimeError::Construction(key))?;
        desc.copy_typed = Some(f);
        Ok(())
    }

    fn unregister(&mut self, key: TypeKey) {
        self.types.remove(&key);
        self.order.retain(|k| *k != key);
    }

    fn flat_desc(&self, name: &str, schema_src: &str) -> Result<&TypeDesc> {
        match self.types.get(&TypeKey::of(name)) {
            Some(d) if d.name == name && d.layout.is_flat() => Ok(d),
            _ => Err(RuntimeError::Schema {
                source_text: schema_src.to_string(),
                message: format!("`{name}` is not a registered flat type"),
            }),
        }
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    pub fn resolve_id(&self, name: &str) -> Result<TypeKey> {
        match self.types.get(&TypeKey::of(name)) {
            Some(d) if d.name == name => Ok(d.key),
            _ => Err(RuntimeError::UnknownType(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool { self.resolve_id(name).is_ok() }

    pub fn name_of(&self, key: TypeKey) -> Option<&str> {
        self.types.get(&key).map(|d| d.name.as_str())
    }

    pub fn layout_of(&self, key: TypeKey) -> Option<&Layout> {
        self.types.get(&key).map(|d| &d.layout)
    }

    pub fn get(&self, key: TypeKey) -> Option<&TypeDesc> { self.types.get(&key) }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDesc> + '_ {
        self.order.iter().filter_map(|k| self.types.get(k))
    }

    pub fn len(&self) -> usize { self.types.len() }

    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    // ── Construction ──────────────────────────────────────────────────────────

    pub fn construct(&self, key: TypeKey) -> Result<Box<dyn Entity>> {
        let desc = self.types.get(&key).ok_or(RuntimeError::Construction(key))?;
        Ok((desc.construct)())
    }

    /// Construct a default instance wrapped as an owned value.
    pub fn create(&self, key: TypeKey) -> Result<Value<'static>> {
        self.construct(key).map(Value::owned)
    }

    pub fn create_by_name(&self, name: &str) -> Result<Value<'static>> {
        self.create(self.resolve_id(name)?)
    }

    // ── Coercion ──────────────────────────────────────────────────────────────

    /// Copy `src` into `dst`. Same-type copies always succeed; otherwise the
    /// destination type's conversion routine decides.
    pub fn copy_convert(&self, dst: &mut dyn Entity, src: &dyn Entity) -> Result<()> {
        if dst.assign_from(src) {
            return Ok(());
        }
        let desc = self.types.get(&dst.type_key()).ok_or_else(|| RuntimeError::UnknownType(dst.type_name().to_string()))?;
        match desc.copy_typed {
            Some(f) => f(dst, src),
            None => Err(RuntimeError::UnsupportedConversion {
                from: src.type_name().to_string(),
                to:   dst.type_name().to_string(),
            }),
        }
    }

    // ── Fields ────────────────────────────────────────────────────────────────

    /// Resolve a dotted field path (`"d.z"`) to `(offset, width)` within the
    /// flattened slots of type `key`.
    pub fn field_span(&self, key: TypeKey, path: &str) -> Result<(usize, usize)> {
        let mut desc = self.types.get(&key).ok_or(RuntimeError::Construction(key))?;
        let mut base = 0;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            let field = desc.layout.field(part).ok_or_else(|| RuntimeError::UnknownField {
                ty:    desc.name.clone(),
                field: path.to_string(),
            })?;
            base += field.offset;
            match (field.kind, parts.peek()) {
                (_, None) => return Ok((base, field.width)),
                (FieldKind::Entity(inner), Some(_)) => {
                    desc = self.types.get(&inner).ok_or(RuntimeError::Construction(inner))?;
                }
                (FieldKind::Num, Some(_)) => break,
            }
        }
        Err(RuntimeError::UnknownField { ty: desc.name.clone(), field: path.to_string() })
    }

    /// Read a numeric field of a flat entity.
    pub fn get_field(&self, entity: &dyn Entity, path: &str) -> Result<f64> {
        let (offset, width) = self.field_span(entity.type_key(), path)?;
        let slots = entity.slots().ok_or_else(|| RuntimeError::type_mismatch("flat entity", entity.type_name()))?;
        if width != 1 {
            return Err(RuntimeError::type_mismatch("f64", format!("{width}-slot field `{path}`")));
        }
        slots.get(offset).copied().ok_or_else(|| RuntimeError::UnknownField {
            ty:    entity.type_name().to_string(),
            field: path.to_string(),
        })
    }

    /// Write a numeric field of a flat entity.
    pub fn set_field(&self, entity: &mut dyn Entity, path: &str, v: f64) -> Result<()> {
        let (offset, width) = self.field_span(entity.type_key(), path)?;
        let mut slots = entity.slots().ok_or_else(|| RuntimeError::type_mismatch("flat entity", entity.type_name()))?;
        if width != 1 || offset >= slots.len() {
            return Err(RuntimeError::type_mismatch("f64", format!("{width}-slot field `{path}`")));
        }
        slots[offset] = v;
        entity.set_slots(&slots);
        Ok(())
    }
}
