use super::base_stream::BaseStream;
use super::error::{PDFError, PDFResult};
use super::lexer::{Lexer, Token};
use super::object::{Dict, PDFObject, Ref};
use super::options::ParserOptions;
use super::parser::Parser;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

const STARTXREF: &[u8] = b"startxref";

/// Cross-reference table entry: where an object lives, or that its number
/// is on the free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefRecord {
    /// Byte offset of the object (for free entries, the next free number)
    pub offset: i64,

    /// True for `f` entries, false for in-use `n` entries
    pub free: bool,
}

/// Cross-reference table for a PDF document.
///
/// Maps (generation, object number) to a record. A record added later for
/// the same key replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XRef {
    records: FxHashMap<Ref, XRefRecord>,
}

impl XRef {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the record for object `id` at `generation`.
    pub fn get(&self, generation: u32, id: u32) -> Option<&XRefRecord> {
        self.records.get(&Ref::new(id, generation))
    }

    /// Looks up the record a reference points to.
    pub fn get_ref(&self, reference: Ref) -> Option<&XRefRecord> {
        self.records.get(&reference)
    }

    /// Adds a record, replacing any previous record for the same key.
    pub fn add(&mut self, reference: Ref, record: XRefRecord) {
        self.records.insert(reference, record);
    }

    /// Adds the records of an older table that this one does not shadow.
    pub fn merge_older(&mut self, older: XRef) {
        for (reference, record) in older.records {
            self.records.entry(reference).or_insert(record);
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over all records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ref, &XRefRecord)> {
        self.records.iter()
    }
}

/// The trailer dictionary closing a cross-reference section.
#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    /// Offset of the previous (older) cross-reference section
    pub prev: Option<i64>,

    /// The document catalog
    pub root: Ref,

    /// The whole trailer dictionary
    pub dict: Dict,
}

impl Trailer {
    /// Extracts `/Root` (required reference) and `/Prev` (optional
    /// non-negative integer) from a trailer dictionary.
    pub fn from_dict(dict: Dict) -> PDFResult<Self> {
        let root = match dict.get(b"/Root".as_slice()) {
            Some(PDFObject::Ref(root)) => *root,
            Some(other) => {
                return Err(PDFError::MalformedTrailer(format!(
                    "/Root is a {}, not a reference",
                    other.kind()
                )));
            }
            None => return Err(PDFError::MalformedTrailer("missing /Root".to_string())),
        };

        let prev = match dict.get(b"/Prev".as_slice()) {
            None => None,
            Some(PDFObject::Integer(offset)) if *offset >= 0 => Some(*offset),
            Some(other) => {
                return Err(PDFError::MalformedTrailer(format!(
                    "/Prev must be a non-negative integer, found {:?}",
                    other
                )));
            }
        };

        Ok(Trailer { prev, root, dict })
    }
}

/// Reader for classic (plain-text) cross-reference tables and trailers.
///
/// Example section:
/// ```text
/// xref
/// 0 3
/// 0000000000 65535 f
/// 0000000015 00000 n
/// 0000000079 00000 n
/// trailer
/// << /Size 3 /Root 1 0 R /Prev 9012 >>
/// startxref
/// 12345
/// %%EOF
/// ```
pub struct XRefParser {
    parser: Parser,
}

impl XRefParser {
    /// Creates a reader over a whole PDF body with default options.
    pub fn new(stream: Box<dyn BaseStream>) -> Self {
        Self::with_options(stream, ParserOptions::default())
    }

    /// Creates a reader over a whole PDF body.
    pub fn with_options(stream: Box<dyn BaseStream>, options: ParserOptions) -> Self {
        XRefParser {
            parser: Parser::with_options(Lexer::new(stream), options),
        }
    }

    /// The object parser over the same source, for fetching objects at the
    /// offsets the table records.
    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    /// Finds the `startxref` footer and returns the offset it names.
    ///
    /// The tail of the source is searched backward, starting with a window
    /// of `startxref_window` bytes and doubling it up to
    /// `max_startxref_window`.
    pub fn locate_startxref(&mut self) -> PDFResult<usize> {
        let options = self.parser.options().clone();
        let stream = self.parser.lexer_mut().stream_mut();
        let length = stream.length();
        let max_window = options
            .max_startxref_window
            .max(options.startxref_window)
            .min(length);
        let mut window = options.startxref_window.min(length);

        let marker = loop {
            stream.set_pos(length - window)?;
            let tail = stream.get_bytes(window)?;

            if let Some(index) = tail
                .windows(STARTXREF.len())
                .rposition(|candidate| candidate == STARTXREF)
            {
                let distance = window - index;
                break length - distance;
            }

            if window >= max_window {
                return Err(PDFError::CrossReferenceNotFound);
            }
            window = (window * 2).max(1).min(max_window);
        };

        self.parser.seek(marker)?;
        self.parser.next_token()?;

        let offset = match self.parser.next_token()? {
            Token::Integer(offset) => usize::try_from(offset).map_err(|_| {
                PDFError::InvalidCrossReference(format!("negative startxref offset {}", offset))
            })?,
            other => {
                return Err(PDFError::InvalidCrossReference(format!(
                    "expected offset after startxref, found {:?}",
                    other
                )));
            }
        };

        debug!(marker, offset, window, "located startxref");
        Ok(offset)
    }

    /// Parses the cross-reference section and trailer at `offset`.
    pub fn parse_section(&mut self, offset: usize) -> PDFResult<(XRef, Trailer)> {
        self.parser.seek(offset).map_err(|e| match e {
            PDFError::InvalidPosition { pos, length } => PDFError::InvalidCrossReference(
                format!("section offset {} beyond end of source ({})", pos, length),
            ),
            other => other,
        })?;

        let token = self.parser.next_token()?;
        if !token.is_keyword("xref") {
            return Err(PDFError::InvalidCrossReference(format!(
                "expected xref at offset {}, found {:?}",
                offset, token
            )));
        }

        let mut xref = XRef::new();
        loop {
            let start = match self.parser.next_token()? {
                Token::Integer(start) => start,
                other => {
                    self.parser.push_back(other);
                    break;
                }
            };

            let count = match self.parser.next_token()? {
                Token::Integer(count) if count >= 0 => count,
                other => {
                    return Err(PDFError::InvalidCrossReference(format!(
                        "expected entry count for subsection {}, found {:?}",
                        start, other
                    )));
                }
            };

            for index in 0..count {
                let (reference, record) = self.read_entry(start.saturating_add(index))?;
                xref.add(reference, record);
            }
        }

        let token = self.parser.next_token()?;
        if !token.is_keyword("trailer") {
            return Err(PDFError::InvalidCrossReference(format!(
                "expected trailer, found {:?}",
                token
            )));
        }

        let trailer = match self.parser.parse_object()? {
            PDFObject::Dictionary(dict) => Trailer::from_dict(dict)?,
            other => {
                return Err(PDFError::MalformedTrailer(format!(
                    "trailer is a {}, not a dictionary",
                    other.kind()
                )));
            }
        };

        debug!(
            offset,
            entries = xref.len(),
            prev = ?trailer.prev,
            "parsed cross-reference section"
        );

        Ok((xref, trailer))
    }

    /// Reads one `offset generation n|f` entry for object `id`.
    fn read_entry(&mut self, id: i64) -> PDFResult<(Ref, XRefRecord)> {
        let offset = self.parser.next_token()?;
        let generation = self.parser.next_token()?;
        let marker = self.parser.next_token()?;

        match (offset, generation, marker) {
            (Token::Integer(offset), Token::Integer(generation), Token::Keyword(kind))
                if kind == b"n" || kind == b"f" =>
            {
                let reference = Ref::from_operands(id, generation).ok_or_else(|| {
                    PDFError::InvalidCrossReference(format!(
                        "object {} generation {} out of range",
                        id, generation
                    ))
                })?;
                Ok((
                    reference,
                    XRefRecord {
                        offset,
                        free: kind == b"f",
                    },
                ))
            }
            (offset, generation, marker) => Err(PDFError::InvalidCrossReference(format!(
                "malformed entry for object {}: {:?} {:?} {:?}",
                id, offset, generation, marker
            ))),
        }
    }

    /// Locates `startxref` and walks the `/Prev` chain.
    ///
    /// Returns all sections merged, newer records shadowing older ones, and
    /// the newest trailer.
    pub fn parse(&mut self) -> PDFResult<(XRef, Trailer)> {
        let max_chain = self.parser.options().max_xref_chain;
        let mut next = Some(self.locate_startxref()?);
        let mut visited = FxHashSet::default();
        let mut merged = XRef::new();
        let mut newest: Option<Trailer> = None;

        while let Some(offset) = next {
            if !visited.insert(offset) {
                return Err(PDFError::InvalidCrossReference(format!(
                    "cross-reference chain loops back to offset {}",
                    offset
                )));
            }
            if visited.len() > max_chain {
                return Err(PDFError::InvalidCrossReference(format!(
                    "cross-reference chain longer than {} sections",
                    max_chain
                )));
            }

            let (xref, trailer) = self.parse_section(offset)?;
            merged.merge_older(xref);

            next = match trailer.prev {
                Some(prev) => Some(usize::try_from(prev).map_err(|_| {
                    PDFError::InvalidCrossReference(format!("/Prev offset {} out of range", prev))
                })?),
                None => None,
            };

            if newest.is_none() {
                newest = Some(trailer);
            }
        }

        debug!(
            sections = visited.len(),
            entries = merged.len(),
            "cross-reference chain complete"
        );

        let trailer = newest.ok_or(PDFError::CrossReferenceNotFound)?;
        Ok((merged, trailer))
    }
}
