use super::eval::Missing;

/// Interpreter configuration.
///
/// With the `serde` feature, missing fields deserialize to their defaults
/// so a partial config section is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Maximum nesting of groups and prefix operators accepted by the parser.
    /// Each level is a few parser frames on the calling thread's stack,
    /// so large limits need a correspondingly large stack.
    pub max_depth: usize,

    /// How variables missing from the context are resolved.
    pub missing: Missing,
}

impl Options {
    /// Fits a 2 MiB thread stack with room to spare in unoptimized builds.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            missing: Missing::Error,
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn missing(mut self, missing: Missing) -> Self {
        self.missing = missing;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
