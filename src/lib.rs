//! Low-level reader for PDF object syntax.
//!
//! [`Lexer`] turns bytes into tokens, [`Parser`] assembles tokens into
//! [`PDFObject`] trees, and [`XRefParser`] reads the cross-reference tables
//! and trailers that locate objects in a file.
//!
//! ```
//! use pdf_syntax::{Lexer, PDFObject, Parser, Ref, Stream};
//!
//! let stream = Stream::from_bytes(b"<< /Root 1 0 R /Kids [2 0 R] >>".to_vec());
//! let mut parser = Parser::new(Lexer::new(Box::new(stream)));
//!
//! let object = parser.parse_object().unwrap();
//! let dict = object.as_dict().unwrap();
//! assert_eq!(dict.get(b"/Root".as_slice()), Some(&PDFObject::Ref(Ref::new(1, 0))));
//! ```

pub mod core;

// Re-export main types for convenience
pub use core::{
    BaseStream, DecodeConfig, Delimiter, Dict, FilterKind, IndirectObject, Lexer, PDFError,
    PDFObject, PDFResult, Parser, ParserOptions, ReaderStream, Ref, Stream, Token, Trailer, XRef,
    XRefParser, XRefRecord,
};
