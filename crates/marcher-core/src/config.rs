//! Runtime configuration.
//!
//! Tunables read by builtins through the call context. Nothing here changes which
//! builtins or types are registered.

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Images with at least this many pixels are tone-mapped on the rayon pool.
    pub parallel_saturate_min: usize,

    /// Factor applied to a shape's bounding radius when its envelope is computed.
    pub envelope_margin: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            parallel_saturate_min: 4096,
            envelope_margin: 1.01,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_envelope_margin(mut self, margin: f64) -> Self {
        self.envelope_margin = margin;
        self
    }

    pub fn with_parallel_saturate_min(mut self, pixels: usize) -> Self {
        self.parallel_saturate_min = pixels;
        self
    }
}
