use thiserror::Error;

/// Universal error type for PDF syntax operations.
///
/// Covers every failure the tokenizer, object builder and cross-reference
/// reader can surface. None of them are recovered locally: a malformed input
/// aborts the current parse and the error is handed to the caller.
#[derive(Debug, Error)]
pub enum PDFError {
    /// Token stream exhausted in the middle of a structure
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// Bracket mismatch, or a value/key of the wrong kind inside a dictionary
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// Malformed `N G obj` header or a missing `endobj`/`stream`/`endstream`
    #[error("invalid indirect object: {0}")]
    InvalidIndirectObject(String),

    /// Malformed subsection header or entry
    #[error("invalid cross-reference table: {0}")]
    InvalidCrossReference(String),

    /// The `startxref` marker was not found near the end of the source
    #[error("cross-reference table not found")]
    CrossReferenceNotFound,

    /// Trailer dictionary without a usable `/Root`, or with an ill-typed `/Prev`
    #[error("malformed trailer: {0}")]
    MalformedTrailer(String),

    /// Missing or unknown `/Filter` in a stream dictionary
    #[error("invalid decode config: {0}")]
    InvalidDecodeConfig(String),

    /// Filter is recognized but has no decoder
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// The decompressor rejected the stream bytes
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// A token shaped like a number that does not fit the numeric type
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// End of the byte source reached by a raw read
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// Invalid position in the byte source
    #[error("invalid position {pos} for stream of length {length}")]
    InvalidPosition { pos: usize, length: usize },

    /// Failure of the underlying reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PDF operations
pub type PDFResult<T> = Result<T, PDFError>;
