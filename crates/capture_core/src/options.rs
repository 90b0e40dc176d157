//! Parse configuration passed explicitly into every loader.

/// Options controlling how captures are decoded into a [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Log file and texture path resolution at `info` level instead of `debug`.
    pub debug: bool,

    /// Apply the position axis remap `(x, -z, y)` to RIP normals as well.
    ///
    /// Off by default: captured normals are passed through unchanged.
    pub remap_normals: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_remap_normals(mut self, remap_normals: bool) -> Self {
        self.remap_normals = remap_normals;
        self
    }

    /// Level used for path traces.
    pub(crate) fn trace_level(&self) -> log::Level {
        if self.debug {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}
