//! Builtin descriptors and the name → builtin table.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, RuntimeError};
use crate::types::key::TypeKey;
use crate::Runtime;
use super::frame::{Arguments, Frame};
use super::value::Value;

// ─── Signature ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty:   String,
    pub name: String,
}

/// `<ret> <name>( <type> <param>, ... )`; the return type may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub ret:    Option<String>,
    pub name:   String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn parse(src: &str) -> Result<Self> {
        let err = |message: &str| RuntimeError::Signature {
            source_text: src.to_string(),
            message: message.to_string(),
        };

        let open = src.find('(').ok_or_else(|| err("missing `(`"))?;
        let close = src.rfind(')').ok_or_else(|| err("missing `)`"))?;
        if close < open || !src[close + 1..].trim().is_empty() {
            return Err(err("unexpected text after `)`"));
        }

        let head: Vec<&str> = src[..open].split_whitespace().collect();
        let (ret, name) = match head.as_slice() {
            [name]      => (None, *name),
            [ret, name] => (Some(ret.to_string()), *name),
            _ => return Err(err("expected `[<return type>] <name>` before `(`")),
        };

        let inner = src[open + 1..close].trim();
        let mut params = Vec::new();
        if !inner.is_empty() {
            for p in inner.split(',') {
                let mut parts = p.split_whitespace();
                let (Some(ty), Some(pname), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err(err("parameters have the form `<type> <name>`"));
                };
                params.push(Param { ty: ty.to_string(), name: pname.to_string() });
            }
        }

        Ok(Self { ret, name: name.to_string(), params })
    }

    pub fn arity(&self) -> usize { self.params.len() }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ret) = &self.ret {
            write!(f, "{ret} ")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{} {}", p.ty, p.name)?;
        }
        if self.params.is_empty() { write!(f, ")") } else { write!(f, " )") }
    }
}

// ─── Builtin ──────────────────────────────────────────────────────────────────

/// Receiver passed to every entry point: the runtime it was dispatched from and the
/// descriptor being invoked.
pub struct CallContext<'r> {
    pub runtime: &'r Runtime,
    pub builtin: &'r Builtin,
}

/// Uniform native entry point.
pub type BuiltinFn = fn(&CallContext<'_>, &dyn Frame, &Arguments) -> Result<Value<'static>>;

pub struct Builtin {
    pub name:      String,
    pub key:       TypeKey,
    pub signature: Signature,
    pub entry:     BuiltinFn,
}

impl Builtin {
    /// Build a descriptor from its signature string; the name is taken from the signature.
    pub fn new(signature: &str, entry: BuiltinFn) -> Result<Self> {
        let signature = Signature::parse(signature)?;
        Ok(Self {
            name: signature.name.clone(),
            key: TypeKey::of(&signature.name),
            signature,
            entry,
        })
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.signature)
    }
}

// ─── Table ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct BuiltinTable {
    builtins: HashMap<TypeKey, Builtin>,
    order:    Vec<TypeKey>,
}

impl BuiltinTable {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, b: Builtin) -> Result<()> {
        if self.builtins.contains_key(&b.key) {
            tracing::warn!(name = %b.name, "duplicate builtin rejected");
            return Err(RuntimeError::DuplicateBuiltin(b.name));
        }
        tracing::debug!(name = %b.name, arity = b.signature.arity(), "register builtin");
        self.order.push(b.key);
        self.builtins.insert(b.key, b);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(&TypeKey::of(name)).filter(|b| b.name == name)
    }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    /// Builtins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Builtin> + '_ {
        self.order.iter().filter_map(|k| self.builtins.get(k))
    }

    pub fn len(&self) -> usize { self.builtins.len() }

    pub fn is_empty(&self) -> bool { self.builtins.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_signature() {
        let s = Signature::parse("f64 pow( num base, num exp )").unwrap();
        assert_eq!(s.ret.as_deref(), Some("f64"));
        assert_eq!(s.name, "pow");
        assert_eq!(s.arity(), 2);
        assert_eq!(s.params[1], Param { ty: "num".into(), name: "exp".into() });
    }

    #[test]
    fn return_type_is_optional() {
        let s = Signature::parse("string_to_num( string text )").unwrap();
        assert_eq!(s.ret, None);
        assert_eq!(s.arity(), 1);
    }

    #[test]
    fn empty_parameter_list() {
        let s = Signature::parse("f64 get_time()").unwrap();
        assert_eq!(s.arity(), 0);
        assert_eq!(s.to_string(), "f64 get_time()");
    }

    #[test]
    fn display_is_canonical() {
        let s = Signature::parse("v3d   create_vec(num x,num y ,  num z)").unwrap();
        assert_eq!(s.to_string(), "v3d create_vec( num x, num y, num z )");
    }

    #[test]
    fn rejects_malformed() {
        for src in ["f64 sin num x", "f64 sin( num )", "a b c( num x )", "f64 sin( num x ) extra", ""] {
            let err = Signature::parse(src).expect_err(src);
            assert!(matches!(err, RuntimeError::Signature { .. }), "{src}: {err:?}");
        }
    }
}
