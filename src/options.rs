//! Conversion options.

/// Default limit on element nesting, matching the depth at which browsers
/// stop nesting parsed elements.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options controlling one conversion.
///
/// ```
/// use h5value::ParseOptions;
///
/// let options = ParseOptions::new().with_max_depth(64).with_max_nodes(10_000);
/// assert_eq!(options.max_depth, 64);
/// assert_eq!(options.max_nodes, Some(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest element nesting the projector accepts. The `html` element
    /// sits at depth 1.
    pub max_depth: usize,
    /// Largest source tree (in nodes, document included) the parser adapter
    /// may produce. `None` leaves only the arena's own id limit.
    pub max_nodes: Option<usize>,
    /// Parse as if scripting were enabled. Affects how `<noscript>`
    /// content is parsed.
    pub scripting: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: None,
            scripting: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }
}
