use std::fmt;

/// Conventional maximum size of the file trailer, scanned first for `startxref`.
pub const DEFAULT_STARTXREF_WINDOW: usize = 128;

/// Options controlling parser tolerance and search bounds.
///
/// All settings have defaults matching strict, conventional PDF syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Size of the tail window first searched for `startxref` (default: 128).
    pub startxref_window: usize,
    /// Largest tail window searched before giving up (default: 1024).
    ///
    /// The window doubles after each miss. Setting this equal to
    /// `startxref_window` restricts the search to a single fixed window.
    pub max_startxref_window: usize,
    /// Accept stream dictionaries without a `/Filter` entry and return the
    /// raw payload (default: false).
    pub allow_unfiltered_streams: bool,
    /// Maximum number of cross-reference sections followed through `/Prev`
    /// (default: 64).
    pub max_xref_chain: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            startxref_window: DEFAULT_STARTXREF_WINDOW,
            max_startxref_window: 1024,
            allow_unfiltered_streams: false,
            max_xref_chain: 64,
        }
    }
}

impl ParserOptions {
    /// Options that search only the fixed 128-byte trailer window.
    pub fn fixed_trailer_window() -> Self {
        Self {
            max_startxref_window: DEFAULT_STARTXREF_WINDOW,
            ..Self::default()
        }
    }
}

impl fmt::Display for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParserOptions(startxref_window={}, max_startxref_window={}, allow_unfiltered_streams={}, max_xref_chain={})",
            self.startxref_window,
            self.max_startxref_window,
            self.allow_unfiltered_streams,
            self.max_xref_chain
        )
    }
}
