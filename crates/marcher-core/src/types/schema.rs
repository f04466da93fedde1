//! Compact schema strings for flat entities and the layouts they resolve to.
//!
//!   `v3d = { f64 x; f64 y; f64 z; }`   # numeric fields
//!   `ray = { v3d p; v3d d; }`          # nested flat entities
//!   `normal = v3d`                     # alias of an existing layout
//!
//! Parsing is purely syntactic. Resolving nested field types to slot widths needs the
//! registry and happens in `TypeRegistry::register_flat`.

use crate::error::{Result, RuntimeError};
use super::key::TypeKey;

/// The only scalar field type a flat entity can hold.
pub const NUM: &str = "f64";

// ─── Parsed form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub ty:   String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaBody {
    Fields(Vec<SchemaField>),
    Alias(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub body: SchemaBody,
}

impl Schema {
    pub fn parse(src: &str) -> Result<Self> {
        let err = |message: &str| RuntimeError::Schema {
            source_text: src.to_string(),
            message: message.to_string(),
        };

        let (name, rhs) = src.split_once('=').ok_or_else(|| err("missing `=`"))?;
        let name = name.trim();
        if !is_ident(name) {
            return Err(err("type name is not an identifier"));
        }
        let rhs = rhs.trim();

        let body = if let Some(inner) = rhs.strip_prefix('{') {
            let inner = inner.strip_suffix('}').ok_or_else(|| err("missing closing `}`"))?;
            let mut fields: Vec<SchemaField> = Vec::new();
            for decl in inner.split(';') {
                let decl = decl.trim();
                if decl.is_empty() { continue; }
                let mut parts = decl.split_whitespace();
                let (Some(ty), Some(field), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err(err("field declarations have the form `<type> <name>;`"));
                };
                if !is_ident(ty) || !is_ident(field) {
                    return Err(err("field type and name must be identifiers"));
                }
                if fields.iter().any(|f| f.name == field) {
                    return Err(err(&format!("duplicate field `{field}`")));
                }
                fields.push(SchemaField { ty: ty.to_string(), name: field.to_string() });
            }
            if fields.is_empty() {
                return Err(err("no fields declared"));
            }
            SchemaBody::Fields(fields)
        } else if is_ident(rhs) {
            SchemaBody::Alias(rhs.to_string())
        } else {
            return Err(err("expected `{ ... }` or the name of an existing type"));
        };

        Ok(Self { name: name.to_string(), body })
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ─── Resolved layout ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Num,
    Entity(TypeKey),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    pub name:   String,
    pub kind:   FieldKind,
    /// First slot of this field inside the flattened record.
    pub offset: usize,
    /// Number of `f64` slots the field occupies.
    pub width:  usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// In-memory size of the Rust type backing the registration.
    pub size:   usize,
    /// Empty for opaque (non-flat) types.
    pub fields: Vec<FieldLayout>,
}

impl Layout {
    pub fn opaque(size: usize) -> Self {
        Self { size, fields: Vec::new() }
    }

    pub fn is_flat(&self) -> bool { !self.fields.is_empty() }

    /// Total number of `f64` slots.
    pub fn slots(&self) -> usize {
        self.fields.iter().map(|f| f.width).sum()
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_fields() {
        let s = Schema::parse("v3d = { f64 x; f64 y; f64 z; }").unwrap();
        assert_eq!(s.name, "v3d");
        let SchemaBody::Fields(fields) = s.body else { panic!("expected fields") };
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert!(fields.iter().all(|f| f.ty == NUM));
    }

    #[test]
    fn parses_alias() {
        let s = Schema::parse("normal = v3d").unwrap();
        assert_eq!(s.body, SchemaBody::Alias("v3d".into()));
    }

    #[test]
    fn trailing_semicolon_is_optional() {
        let s = Schema::parse("v2d = { f64 x; f64 y }").unwrap();
        let SchemaBody::Fields(fields) = s.body else { panic!("expected fields") };
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn rejects_malformed() {
        for src in [
            "v3d { f64 x; }",
            "v3d = { f64 x; ",
            "v3d = { }",
            "v3d = { f64 x y; }",
            "v3d = { f64 x; f64 x; }",
            "3d = { f64 x; }",
            "v3d = 1 + 2",
        ] {
            let err = Schema::parse(src).expect_err(src);
            assert!(matches!(err, RuntimeError::Schema { .. }), "{src}: {err:?}");
        }
    }

    #[test]
    fn slots_count_field_widths() {
        let a = Layout {
            size: 24,
            fields: vec![
                FieldLayout { name: "x".into(), kind: FieldKind::Num, offset: 0, width: 1 },
                FieldLayout { name: "y".into(), kind: FieldKind::Num, offset: 1, width: 2 },
            ],
        };
        assert_eq!(a.slots(), 3);
        assert!(a.is_flat());
        assert!(!Layout::opaque(24).is_flat());
    }
}
