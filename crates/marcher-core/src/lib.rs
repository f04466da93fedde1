pub mod types;
pub mod runtime;
pub mod error;
pub mod config;
pub mod namespaces;

pub use config::RuntimeConfig;
pub use error::{ErrorCode, RuntimeError, Severity};
pub use runtime::dispatch::{Builtin, BuiltinFn, CallContext, Signature};
pub use runtime::frame::{Argument, Arguments, EvalFrame, Frame};
pub use runtime::value::{Ownership, Value};
pub use types::entity::{Entity, FlatEntity};
pub use types::key::TypeKey;
pub use types::registry::TypeRegistry;

use std::time::Instant;

use runtime::dispatch::BuiltinTable;

// ─── Lifecycle signals ────────────────────────────────────────────────────────

/// Phase tags a host sends to the runtime. Only `Init1` does any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Init0,
    Init1,
    Down1,
    Down0,
}

// ─── Runtime ──────────────────────────────────────────────────────────────────

/// Type registry, builtin table and configuration for one script host.
///
/// Lifecycle:
///   1. `Runtime::new(config)`: empty registries, start instant captured.
///   2. `runtime.signal(Signal::Init1)`: registers every standard type and builtin,
///      once, in a fixed order.
///   3. `runtime.dispatch(name, frame, args)`: read-only from here on.
pub struct Runtime {
    types:       TypeRegistry,
    builtins:    BuiltinTable,
    config:      RuntimeConfig,
    started:     Instant,
    initialized: bool,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            types: TypeRegistry::new(),
            builtins: BuiltinTable::new(),
            config,
            started: Instant::now(),
            initialized: false,
        }
    }

    /// `new(RuntimeConfig::default())` followed by `Init1`.
    pub fn standard() -> Result<Self, RuntimeError> {
        let mut rt = Self::new(RuntimeConfig::default());
        rt.signal(Signal::Init1)?;
        Ok(rt)
    }

    /// Handle a lifecycle signal. `Init1` performs all registrations the first time it
    /// is received; every other signal, and any repeated `Init1`, is a no-op.
    pub fn signal(&mut self, signal: Signal) -> Result<(), RuntimeError> {
        match signal {
            Signal::Init1 if !self.initialized => {
                namespaces::register_types(&mut self.types)?;
                namespaces::register_builtins(self)?;
                self.initialized = true;
                tracing::debug!(types = self.types.len(), builtins = self.builtins.len(), "runtime initialized");
            }
            _ => {}
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool { self.initialized }

    /// Add a builtin. Its name must not collide with another builtin or a registered type.
    pub fn register_builtin(&mut self, b: Builtin) -> Result<(), RuntimeError> {
        if self.types.contains(&b.name) {
            tracing::warn!(name = %b.name, "builtin name shadows a registered type");
            return Err(RuntimeError::DuplicateBuiltin(b.name));
        }
        self.builtins.register(b)
    }

    /// Resolve `name` and invoke it. Ownership of the result passes to the caller.
    pub fn dispatch(&self, name: &str, frame: &dyn Frame, args: &Arguments) -> Result<Value<'static>, RuntimeError> {
        let builtin = self.builtins.get(name).ok_or_else(|| RuntimeError::UnknownBuiltin(name.to_string()))?;
        tracing::debug!(name, argc = args.size(), "dispatch");
        let ctx = CallContext { runtime: self, builtin };
        (builtin.entry)(&ctx, frame, args).map_err(|e| self.name_types(e))
    }

    /// Type-hint checks only know the expected key; swap in the registered name.
    fn name_types(&self, err: RuntimeError) -> RuntimeError {
        match err {
            RuntimeError::TypeMismatch { expected, got } => {
                let expected = TypeKey::parse_display(&expected)
                    .and_then(|key| self.types.name_of(key))
                    .map_or(expected, str::to_string);
                RuntimeError::TypeMismatch { expected, got }
            }
            other => other,
        }
    }

    pub fn types(&self) -> &TypeRegistry { &self.types }

    pub fn types_mut(&mut self) -> &mut TypeRegistry { &mut self.types }

    pub fn builtins(&self) -> impl Iterator<Item = &Builtin> + '_ { self.builtins.iter() }

    pub fn builtin(&self, name: &str) -> Option<&Builtin> { self.builtins.get(name) }

    pub fn config(&self) -> &RuntimeConfig { &self.config }

    /// Seconds since this runtime was created.
    pub fn elapsed(&self) -> f64 { self.started.elapsed().as_secs_f64() }
}
