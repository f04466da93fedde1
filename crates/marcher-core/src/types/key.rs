use std::fmt;

/// Stable numeric identity of a registered type, derived from its declared name.
///
/// 64-bit FNV-1a over the UTF-8 bytes of the name. The value depends only on the
/// name, so it is identical across runs and across `Runtime` instances. The registry
/// rejects a second name that lands on an occupied key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(u64);

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME:  u64 = 0x0000_0100_0000_01b3;

impl TypeKey {
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    pub const fn raw(self) -> u64 { self.0 }

    /// Inverse of the `Display` form (`#` followed by 16 hex digits).
    pub fn parse_display(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#').filter(|h| h.len() == 16)?;
        u64::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}
