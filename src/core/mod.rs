pub mod base_stream;
pub mod decode;
pub mod error;
pub mod lexer;
pub mod object;
pub mod options;
pub mod parser;
pub mod reader_stream;
pub mod stream;
pub mod xref;

pub use base_stream::BaseStream;
pub use decode::{DecodeConfig, FilterKind};
pub use error::{PDFError, PDFResult};
pub use lexer::{Delimiter, Lexer, Token};
pub use object::{Dict, IndirectObject, PDFObject, Ref};
pub use options::ParserOptions;
pub use parser::Parser;
pub use reader_stream::ReaderStream;
pub use stream::Stream;
pub use xref::{Trailer, XRef, XRefParser, XRefRecord};
