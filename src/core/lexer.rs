use super::base_stream::BaseStream;
use super::error::{PDFError, PDFResult};
use super::object::PDFObject;
use tracing::warn;

const ENDSTREAM: &[u8] = b"endstream";

/// Structural markers. They delimit objects but are not objects themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// `<<`
    DictOpen,
    /// `>>`
    DictClose,
    /// `{`
    ProcOpen,
    /// `}`
    ProcClose,
}

impl Delimiter {
    /// Returns the delimiter as it appears in PDF syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::ArrayOpen => "[",
            Delimiter::ArrayClose => "]",
            Delimiter::DictOpen => "<<",
            Delimiter::DictClose => ">>",
            Delimiter::ProcOpen => "{",
            Delimiter::ProcClose => "}",
        }
    }
}

/// PDF token types returned by the Lexer.
///
/// The leaf variants (`Null` through `Name`) are complete objects on their
/// own. Tokens carry no position information.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// End of input, also produced for lexically malformed input
    EOF,

    /// Bare word that is not a boolean, null or number (`obj`, `R`, `n`, ...),
    /// as raw bytes
    Keyword(Vec<u8>),

    /// Structural marker
    Delimiter(Delimiter),

    /// `null`, or a stray delimiter byte
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Optional sign followed by digits
    Integer(i64),

    /// Optional sign, digits and exactly one `.`
    Real(f64),

    /// Literal or hex string
    String(Vec<u8>),

    /// Name as raw bytes, including its leading `/`
    Name(Vec<u8>),
}

impl Token {
    /// Returns true if this token is the given keyword.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Keyword(k) if k == keyword.as_bytes())
    }

    /// Converts a leaf token into its object, handing other tokens back.
    pub fn into_object(self) -> Result<PDFObject, Token> {
        match self {
            Token::Null => Ok(PDFObject::Null),
            Token::Boolean(b) => Ok(PDFObject::Boolean(b)),
            Token::Integer(n) => Ok(PDFObject::Integer(n)),
            Token::Real(n) => Ok(PDFObject::Real(n)),
            Token::String(s) => Ok(PDFObject::String(s)),
            Token::Name(n) => Ok(PDFObject::Name(n)),
            other => Err(other),
        }
    }
}

/// PDF Lexer for tokenizing PDF syntax.
///
/// Turns the bytes of a seekable source into tokens following the
/// PostScript-derived lexical rules of PDF. It has no knowledge of object
/// structure.
///
/// Lexical errors never surface as `Err`: a malformed string, an unterminated
/// construct or a bad escape degrade to [`Token::EOF`]. Errors are reserved
/// for failures of the source itself and for integers that overflow `i64`.
pub struct Lexer {
    /// The input stream
    stream: Box<dyn BaseStream>,

    /// Buffer for building strings
    str_buf: Vec<u8>,
}

impl Lexer {
    /// Creates a new Lexer reading from the current position of `stream`.
    pub fn new(stream: Box<dyn BaseStream>) -> Self {
        Lexer {
            stream,
            str_buf: Vec::new(),
        }
    }

    /// Returns the current byte offset in the source.
    pub fn position(&self) -> usize {
        self.stream.pos()
    }

    /// Moves the cursor to `pos`.
    pub fn set_position(&mut self, pos: usize) -> PDFResult<()> {
        self.stream.set_pos(pos)
    }

    /// Gives raw access to the underlying source.
    pub fn stream_mut(&mut self) -> &mut dyn BaseStream {
        self.stream.as_mut()
    }

    /// Reads the next byte, mapping end of source to `None`.
    fn read_byte(&mut self) -> PDFResult<Option<u8>> {
        match self.stream.get_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(PDFError::UnexpectedEndOfStream) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Peeks at the next byte without consuming it.
    fn peek_byte(&mut self) -> PDFResult<Option<u8>> {
        match self.stream.peek_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(PDFError::UnexpectedEndOfStream) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Checks if a character is whitespace according to PDF spec.
    ///
    /// PDF whitespace: NUL, TAB, LF, FF, CR, SPACE
    pub fn is_whitespace(ch: u8) -> bool {
        matches!(ch, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
    }

    /// Checks if a character is a delimiter according to PDF spec.
    ///
    /// PDF delimiters: ( ) < > [ ] { } / %
    pub fn is_delimiter(ch: u8) -> bool {
        matches!(
            ch,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
    }

    /// Checks if a character is special (whitespace or delimiter).
    fn is_special(ch: u8) -> bool {
        Self::is_whitespace(ch) || Self::is_delimiter(ch)
    }

    /// Converts a hex character to its numeric value.
    fn to_hex_digit(ch: u8) -> Option<u8> {
        match ch {
            b'0'..=b'9' => Some(ch - b'0'),
            b'a'..=b'f' => Some(ch - b'a' + 10),
            b'A'..=b'F' => Some(ch - b'A' + 10),
            _ => None,
        }
    }

    /// Skips whitespace and comments.
    ///
    /// Returns false if the source ended first.
    fn skip_whitespace_and_comments(&mut self) -> PDFResult<bool> {
        loop {
            match self.peek_byte()? {
                None => return Ok(false),
                Some(b'%') => loop {
                    match self.read_byte()? {
                        None => return Ok(false),
                        Some(b'\n' | b'\r') => break,
                        Some(_) => {}
                    }
                },
                Some(ch) if Self::is_whitespace(ch) => {
                    self.read_byte()?;
                }
                Some(_) => return Ok(true),
            }
        }
    }

    /// Gets the next token from the stream.
    pub fn next_token(&mut self) -> PDFResult<Token> {
        if !self.skip_whitespace_and_comments()? {
            return Ok(Token::EOF);
        }

        let Some(ch) = self.read_byte()? else {
            return Ok(Token::EOF);
        };

        match ch {
            b'/' => self.get_name(),

            b'<' => {
                if self.peek_byte()? == Some(b'<') {
                    self.read_byte()?;
                    Ok(Token::Delimiter(Delimiter::DictOpen))
                } else {
                    self.get_hex_string()
                }
            }

            b'(' => self.get_string(),

            b'[' => Ok(Token::Delimiter(Delimiter::ArrayOpen)),
            b']' => Ok(Token::Delimiter(Delimiter::ArrayClose)),
            b'{' => Ok(Token::Delimiter(Delimiter::ProcOpen)),
            b'}' => Ok(Token::Delimiter(Delimiter::ProcClose)),

            b'>' if self.peek_byte()? == Some(b'>') => {
                self.read_byte()?;
                Ok(Token::Delimiter(Delimiter::DictClose))
            }

            // A lone '>' or ')' never starts a token
            _ if Self::is_delimiter(ch) => Ok(Token::Null),

            _ => self.get_keyword(ch),
        }
    }

    /// Parses a name token. The leading '/' has been consumed.
    ///
    /// Handles '#' escape sequences like #20 for space. A '#' not followed by
    /// two hex digits is kept as is.
    fn get_name(&mut self) -> PDFResult<Token> {
        self.str_buf.clear();
        self.str_buf.push(b'/');

        while let Some(ch) = self.peek_byte()? {
            if Self::is_special(ch) {
                break;
            }
            self.read_byte()?;

            if ch == b'#' {
                let escape = match self.stream.peek_bytes(2) {
                    Ok(digits) => Self::to_hex_digit(digits[0])
                        .zip(Self::to_hex_digit(digits[1]))
                        .map(|(hi, lo)| (hi << 4) | lo),
                    Err(PDFError::UnexpectedEndOfStream) => None,
                    Err(e) => return Err(e),
                };

                if let Some(byte) = escape {
                    self.stream.get_bytes(2)?;
                    self.str_buf.push(byte);
                    continue;
                }
            }

            self.str_buf.push(ch);
        }

        Ok(Token::Name(self.str_buf.clone()))
    }

    /// Parses a hex string token: <48656c6c6f>
    ///
    /// Whitespace between digits is skipped and an odd final digit is padded
    /// with 0. A non-hex byte or a missing '>' yields EOF.
    fn get_hex_string(&mut self) -> PDFResult<Token> {
        self.str_buf.clear();
        let mut first_digit: Option<u8> = None;

        loop {
            let Some(ch) = self.read_byte()? else {
                return Ok(Token::EOF);
            };

            if ch == b'>' {
                break;
            }
            if Self::is_whitespace(ch) {
                continue;
            }

            let Some(digit) = Self::to_hex_digit(ch) else {
                return Ok(Token::EOF);
            };

            match first_digit.take() {
                Some(high) => self.str_buf.push((high << 4) | digit),
                None => first_digit = Some(digit),
            }
        }

        if let Some(high) = first_digit {
            self.str_buf.push(high << 4);
        }

        Ok(Token::String(self.str_buf.clone()))
    }

    /// Parses a literal string token. The opening '(' has been consumed.
    ///
    /// Handles nested parentheses and escape sequences. An unknown escape is
    /// kept as the two raw bytes; an octal escape above 255 or an
    /// unterminated string yields EOF.
    fn get_string(&mut self) -> PDFResult<Token> {
        self.str_buf.clear();
        let mut depth = 1;

        loop {
            let Some(ch) = self.read_byte()? else {
                return Ok(Token::EOF);
            };

            match ch {
                b'(' => {
                    depth += 1;
                    self.str_buf.push(ch);
                }

                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    self.str_buf.push(ch);
                }

                b'\\' => {
                    let Some(escaped) = self.read_byte()? else {
                        return Ok(Token::EOF);
                    };

                    match escaped {
                        b'n' => self.str_buf.push(b'\n'),
                        b'r' => self.str_buf.push(b'\r'),
                        b't' => self.str_buf.push(b'\t'),
                        b'b' => self.str_buf.push(0x08),
                        b'f' => self.str_buf.push(0x0C),
                        b'(' | b')' | b'\\' => self.str_buf.push(escaped),

                        // Line continuation: CR, LF or CRLF
                        b'\r' => {
                            if self.peek_byte()? == Some(b'\n') {
                                self.read_byte()?;
                            }
                        }
                        b'\n' => {}

                        b'0'..=b'7' => {
                            let mut value = u32::from(escaped - b'0');
                            for _ in 0..2 {
                                match self.peek_byte()? {
                                    Some(d @ b'0'..=b'7') => {
                                        self.read_byte()?;
                                        value = value * 8 + u32::from(d - b'0');
                                    }
                                    _ => break,
                                }
                            }

                            let Ok(byte) = u8::try_from(value) else {
                                return Ok(Token::EOF);
                            };
                            self.str_buf.push(byte);
                        }

                        _ => {
                            self.str_buf.push(b'\\');
                            self.str_buf.push(escaped);
                        }
                    }
                }

                _ => self.str_buf.push(ch),
            }
        }

        Ok(Token::String(self.str_buf.clone()))
    }

    /// Parses a keyword, boolean, null or number starting with `first`.
    fn get_keyword(&mut self, first: u8) -> PDFResult<Token> {
        self.str_buf.clear();
        self.str_buf.push(first);

        while let Some(ch) = self.peek_byte()? {
            if Self::is_special(ch) {
                break;
            }
            self.read_byte()?;
            self.str_buf.push(ch);
        }

        let text = self.str_buf.as_slice();

        match text {
            b"true" => return Ok(Token::Boolean(true)),
            b"false" => return Ok(Token::Boolean(false)),
            b"null" => return Ok(Token::Null),
            _ => {}
        }

        // Numbers are pure ASCII; anything else stays a keyword byte for byte
        let number = std::str::from_utf8(text)
            .ok()
            .and_then(|digits| classify_number(digits).map(|shape| (digits, shape)));

        match number {
            Some((digits, NumberShape::Integer)) => digits
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| PDFError::InvalidNumber(digits.to_string())),
            Some((digits, NumberShape::Real)) => digits
                .parse::<f64>()
                .map(Token::Real)
                .map_err(|_| PDFError::InvalidNumber(digits.to_string())),
            None => Ok(Token::Keyword(text.to_vec())),
        }
    }

    /// Reads the raw payload of a stream. The `stream` keyword has just been
    /// consumed.
    ///
    /// The end-of-line marker after the keyword is skipped. With a `length`,
    /// exactly that many bytes are read, provided `endstream` follows them;
    /// otherwise the payload runs up to the next `endstream`, minus the
    /// end-of-line marker preceding it. The cursor is left on `endstream`.
    pub fn read_stream_payload(&mut self, length: Option<usize>) -> PDFResult<Vec<u8>> {
        self.skip_stream_eol()?;
        let start = self.stream.pos();

        if let Some(length) = length {
            match self.stream.get_bytes(length) {
                Ok(data) => {
                    if self.at_endstream()? {
                        return Ok(data);
                    }
                    warn!(start, length, "stream /Length does not end at endstream, scanning");
                }
                Err(PDFError::UnexpectedEndOfStream) => {
                    warn!(start, length, "stream /Length runs past end of source, scanning");
                }
                Err(e) => return Err(e),
            }
            self.stream.set_pos(start)?;
        }

        self.scan_to_endstream()
    }

    /// Skips one CRLF, LF or CR after the `stream` keyword, along with any
    /// blanks before it. Blanks not followed by an end-of-line marker belong
    /// to the payload and are left in place.
    fn skip_stream_eol(&mut self) -> PDFResult<()> {
        let start = self.stream.pos();

        while let Some(b' ' | b'\t') = self.peek_byte()? {
            self.read_byte()?;
        }

        match self.peek_byte()? {
            Some(b'\r') => {
                self.read_byte()?;
                if self.peek_byte()? == Some(b'\n') {
                    self.read_byte()?;
                }
            }
            Some(b'\n') => {
                self.read_byte()?;
            }
            _ => self.stream.set_pos(start)?,
        }

        Ok(())
    }

    /// Checks whether `endstream` follows, ignoring whitespace, without
    /// moving the cursor.
    fn at_endstream(&mut self) -> PDFResult<bool> {
        let pos = self.stream.pos();

        while let Some(ch) = self.peek_byte()? {
            if !Self::is_whitespace(ch) {
                break;
            }
            self.read_byte()?;
        }

        let found = match self.stream.peek_bytes(ENDSTREAM.len()) {
            Ok(bytes) => bytes == ENDSTREAM,
            Err(PDFError::UnexpectedEndOfStream) => false,
            Err(e) => return Err(e),
        };

        self.stream.set_pos(pos)?;
        Ok(found)
    }

    /// Collects bytes up to the next `endstream` and rewinds onto it.
    fn scan_to_endstream(&mut self) -> PDFResult<Vec<u8>> {
        let mut data = Vec::new();

        loop {
            let Some(byte) = self.read_byte()? else {
                return Err(PDFError::UnexpectedEndOfInput);
            };
            data.push(byte);
            if data.ends_with(ENDSTREAM) {
                break;
            }
        }

        data.truncate(data.len() - ENDSTREAM.len());
        let marker = self.stream.pos() - ENDSTREAM.len();
        self.stream.set_pos(marker)?;

        if data.ends_with(b"\r\n") {
            data.truncate(data.len() - 2);
        } else if data.ends_with(b"\n") || data.ends_with(b"\r") {
            data.pop();
        }

        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberShape {
    Integer,
    Real,
}

/// Optional sign, then digits with at most one '.', and at least one digit.
fn classify_number(text: &str) -> Option<NumberShape> {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);

    let mut digits = 0;
    let mut dots = 0;
    for ch in body.bytes() {
        match ch {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return None,
        }
    }

    match (digits, dots) {
        (0, _) => None,
        (_, 0) => Some(NumberShape::Integer),
        (_, 1) => Some(NumberShape::Real),
        _ => None,
    }
}
