use super::decode::DecodeConfig;
use super::error::{PDFError, PDFResult};
use super::lexer::{Delimiter, Lexer, Token};
use super::object::{Dict, IndirectObject, PDFObject, Ref};
use super::options::ParserOptions;
use smallvec::SmallVec;
use tracing::trace;

/// An entry of the bracket-matching stack: either a token still waiting for
/// its closing delimiter or a finished object.
#[derive(Debug)]
enum StackItem {
    Token(Token),
    Object(PDFObject),
}

/// PDF Parser for building PDF objects from tokens.
///
/// Arrays and dictionaries are assembled with an explicit stack instead of
/// recursion, so nesting depth is bounded by memory rather than by the call
/// stack. A small pushback buffer provides the lookahead needed to tell a
/// bare integer from an `N G obj` header or an `N G R` reference.
pub struct Parser {
    /// The lexer that provides tokens
    lexer: Lexer,

    /// Tokens read ahead and handed back, most recent last
    pushback: SmallVec<[Token; 3]>,

    /// Lexing error hit while reading ahead, reported after the pushback
    pending_error: Option<PDFError>,

    options: ParserOptions,
}

impl Parser {
    /// Creates a new Parser from a Lexer with default options.
    pub fn new(lexer: Lexer) -> Self {
        Self::with_options(lexer, ParserOptions::default())
    }

    /// Creates a new Parser from a Lexer with the given options.
    pub fn with_options(lexer: Lexer, options: ParserOptions) -> Self {
        Parser {
            lexer,
            pushback: SmallVec::new(),
            pending_error: None,
            options,
        }
    }

    /// Returns the options this parser was built with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Returns the next token, taking pushed back tokens first.
    pub fn next_token(&mut self) -> PDFResult<Token> {
        if let Some(token) = self.pushback.pop() {
            return Ok(token);
        }
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }
        self.lexer.next_token()
    }

    /// Reads a token ahead of the object being built.
    ///
    /// A lexing error is held back and returned by `next_token` once the
    /// tokens before it are consumed, so a complete object is never lost to
    /// a bad token after it.
    fn lookahead(&mut self) -> Option<Token> {
        if let Some(token) = self.pushback.pop() {
            return Some(token);
        }
        if self.pending_error.is_some() {
            return None;
        }
        match self.lexer.next_token() {
            Ok(token) => Some(token),
            Err(e) => {
                self.pending_error = Some(e);
                None
            }
        }
    }

    /// Hands a token back; it is returned by the next `next_token` call.
    pub fn push_back(&mut self, token: Token) {
        self.pushback.push(token);
    }

    /// Returns the lexer's position in the source.
    ///
    /// Pushed back tokens have already been consumed from the source, so the
    /// position is past them.
    pub fn position(&self) -> usize {
        self.lexer.position()
    }

    /// Moves to `pos`, discarding any pushed back tokens.
    pub fn seek(&mut self, pos: usize) -> PDFResult<()> {
        self.pushback.clear();
        self.pending_error = None;
        self.lexer.set_position(pos)
    }

    /// Gives direct access to the lexer. Pushed back tokens are discarded.
    pub fn lexer_mut(&mut self) -> &mut Lexer {
        self.pushback.clear();
        self.pending_error = None;
        &mut self.lexer
    }

    /// Seeks to `offset` and parses the object found there.
    pub fn parse_object_at(&mut self, offset: usize) -> PDFResult<PDFObject> {
        self.seek(offset)?;
        self.parse_object()
    }

    /// Parses the next object.
    ///
    /// A leading integer is followed by up to two more tokens to decide
    /// between an indirect object (`N G obj ... endobj`), whose contained
    /// object is returned, and a direct one. Nothing is read past any other
    /// first token. Fails with `UnexpectedEndOfInput` if no object is left.
    pub fn parse_object(&mut self) -> PDFResult<PDFObject> {
        let first = self.next_token()?;
        match first {
            Token::EOF => return Err(PDFError::UnexpectedEndOfInput),
            Token::Integer(_) => {}
            _ => {
                self.push_back(first);
                return self.parse_direct();
            }
        }

        let is_indirect = match self.lookahead() {
            Some(second @ Token::Integer(_)) => {
                let third = self.lookahead();
                let is_obj = third.as_ref().is_some_and(|t| t.is_keyword("obj"));
                if let Some(third) = third {
                    self.push_back(third);
                }
                self.push_back(second);
                is_obj
            }
            Some(second) => {
                self.push_back(second);
                false
            }
            None => false,
        };
        self.push_back(first);

        if is_indirect {
            Ok(self.parse_indirect_object()?.object)
        } else {
            self.parse_direct()
        }
    }

    /// Parses an indirect object: `N G obj <object> endobj`, or a stream
    /// `N G obj <<dict>> stream ... endstream endobj`.
    pub fn parse_indirect_object(&mut self) -> PDFResult<IndirectObject> {
        let num = self.next_token()?;
        let generation = self.next_token()?;
        let keyword = self.next_token()?;

        let reference = match (num, generation) {
            (Token::Integer(num), Token::Integer(generation)) if keyword.is_keyword("obj") => {
                Ref::from_operands(num, generation).ok_or_else(|| {
                    PDFError::InvalidIndirectObject(format!(
                        "object number {} {} out of range",
                        num, generation
                    ))
                })?
            }
            (num, generation) => {
                return Err(PDFError::InvalidIndirectObject(format!(
                    "expected 'N G obj', found {:?} {:?} {:?}",
                    num, generation, keyword
                )));
            }
        };

        trace!(
            num = reference.num,
            generation = reference.generation,
            pos = self.position(),
            "indirect object header"
        );

        let object = self.parse_direct()?;
        let terminator = self.next_token()?;

        let object = if terminator.is_keyword("endobj") {
            object
        } else if terminator.is_keyword("stream") {
            let stream = self.parse_stream(object)?;
            self.expect_keyword("endobj")?;
            stream
        } else {
            return Err(PDFError::InvalidIndirectObject(format!(
                "expected endobj or stream after object {} {}, found {:?}",
                reference.num, reference.generation, terminator
            )));
        };

        Ok(IndirectObject { reference, object })
    }

    /// Reads the payload after the `stream` keyword and decodes it with the
    /// filter named by `object`, the stream's parameter dictionary.
    fn parse_stream(&mut self, object: PDFObject) -> PDFResult<PDFObject> {
        let PDFObject::Dictionary(dict) = object else {
            return Err(PDFError::InvalidIndirectObject(format!(
                "stream must follow a dictionary, found {}",
                object.kind()
            )));
        };

        // The payload is read from the lexer's cursor, which must sit right
        // after the keyword.
        if !self.pushback.is_empty() || self.pending_error.is_some() {
            return Err(PDFError::InvalidIndirectObject(
                "stream keyword reached through lookahead".to_string(),
            ));
        }

        let config = match DecodeConfig::from_dict(&dict) {
            Ok(config) => Some(config),
            Err(PDFError::InvalidDecodeConfig(_))
                if self.options.allow_unfiltered_streams
                    && !dict.contains_key(b"/Filter".as_slice()) =>
            {
                None
            }
            Err(e) => return Err(e),
        };

        let length = dict
            .get(b"/Length".as_slice())
            .and_then(PDFObject::as_integer)
            .and_then(|n| usize::try_from(n).ok());

        let raw = self.lexer.read_stream_payload(length)?;
        let data = match config {
            Some(config) => config.decode(&raw)?,
            None => raw,
        };

        self.expect_keyword("endstream")?;

        Ok(PDFObject::Stream { dict, data })
    }

    fn expect_keyword(&mut self, keyword: &str) -> PDFResult<()> {
        let token = self.next_token()?;
        if token.is_keyword(keyword) {
            Ok(())
        } else {
            Err(PDFError::InvalidIndirectObject(format!(
                "expected {}, found {:?}",
                keyword, token
            )))
        }
    }

    /// Parses a direct object with explicit-stack bracket matching.
    fn parse_direct(&mut self) -> PDFResult<PDFObject> {
        let mut stack: Vec<StackItem> = Vec::new();

        loop {
            let token = self.next_token()?;

            let object = match token {
                Token::EOF => return Err(PDFError::UnexpectedEndOfInput),

                Token::Delimiter(Delimiter::ArrayClose) => {
                    PDFObject::Array(Self::collect_array(&mut stack)?)
                }

                Token::Delimiter(Delimiter::DictClose) => {
                    PDFObject::Dictionary(Self::collect_dict(&mut stack)?)
                }

                Token::Keyword(ref keyword) if keyword == b"R" => {
                    match Self::fold_reference(&mut stack) {
                        Some(reference) => PDFObject::Ref(reference),
                        None => {
                            stack.push(StackItem::Token(token));
                            continue;
                        }
                    }
                }

                Token::Integer(num) if stack.is_empty() => return Ok(self.finish_integer(num)),

                other => match other.into_object() {
                    Ok(object) => object,
                    Err(token) => {
                        stack.push(StackItem::Token(token));
                        continue;
                    }
                },
            };

            if stack.is_empty() {
                return Ok(object);
            }
            stack.push(StackItem::Object(object));
        }
    }

    /// Decides whether a top-level integer starts an `N G R` reference.
    fn finish_integer(&mut self, num: i64) -> PDFObject {
        let Some(second) = self.lookahead() else {
            return PDFObject::Integer(num);
        };

        if let Token::Integer(generation) = second {
            let third = self.lookahead();
            let reference = third
                .as_ref()
                .filter(|t| t.is_keyword("R"))
                .and_then(|_| Ref::from_operands(num, generation));
            if let Some(reference) = reference {
                return PDFObject::Ref(reference);
            }
            if let Some(third) = third {
                self.push_back(third);
            }
        }

        self.push_back(second);
        PDFObject::Integer(num)
    }

    /// Replaces the two integers on top of the stack with a reference.
    fn fold_reference(stack: &mut Vec<StackItem>) -> Option<Ref> {
        let [
            ..,
            StackItem::Object(PDFObject::Integer(num)),
            StackItem::Object(PDFObject::Integer(generation)),
        ] = stack.as_slice()
        else {
            return None;
        };

        let reference = Ref::from_operands(*num, *generation)?;
        stack.truncate(stack.len() - 2);
        Some(reference)
    }

    /// Pops the elements of an array back to its `[`.
    fn collect_array(stack: &mut Vec<StackItem>) -> PDFResult<Vec<PDFObject>> {
        let mut items = Vec::new();

        loop {
            match stack.pop() {
                Some(StackItem::Object(object)) => items.push(object),
                Some(StackItem::Token(Token::Delimiter(Delimiter::ArrayOpen))) => break,
                Some(StackItem::Token(token)) => {
                    return Err(PDFError::InvalidObject(format!(
                        "unexpected {:?} in array",
                        token
                    )));
                }
                None => return Err(PDFError::InvalidObject("unmatched ]".to_string())),
            }
        }

        items.reverse();
        Ok(items)
    }

    /// Pops value/key pairs back to the dictionary's `<<`.
    fn collect_dict(stack: &mut Vec<StackItem>) -> PDFResult<Dict> {
        let mut pairs = Vec::new();

        loop {
            let value = match stack.pop() {
                Some(StackItem::Object(object)) => object,
                Some(StackItem::Token(Token::Delimiter(Delimiter::DictOpen))) => break,
                Some(StackItem::Token(token)) => {
                    return Err(PDFError::InvalidObject(format!(
                        "unexpected {:?} in dictionary",
                        token
                    )));
                }
                None => return Err(PDFError::InvalidObject("unmatched >>".to_string())),
            };

            let key = match stack.pop() {
                Some(StackItem::Object(PDFObject::Name(name))) => name,
                Some(StackItem::Object(other)) => {
                    return Err(PDFError::InvalidObject(format!(
                        "dictionary key must be a name, found {}",
                        other.kind()
                    )));
                }
                Some(StackItem::Token(Token::Delimiter(Delimiter::DictOpen))) => {
                    return Err(PDFError::InvalidObject(format!(
                        "dictionary value {} has no key",
                        value.kind()
                    )));
                }
                Some(StackItem::Token(token)) => {
                    return Err(PDFError::InvalidObject(format!(
                        "unexpected {:?} in dictionary",
                        token
                    )));
                }
                None => return Err(PDFError::InvalidObject("unmatched >>".to_string())),
            };

            pairs.push((key, value));
        }

        // Pairs were popped last-first; inserting in declaration order lets
        // a repeated key keep its first position with its last value.
        let mut dict = Dict::with_capacity(pairs.len());
        for (key, value) in pairs.into_iter().rev() {
            dict.insert(key, value);
        }
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Stream;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn parser(data: &[u8]) -> Parser {
        Parser::new(Lexer::new(Box::new(Stream::from_bytes(data.to_vec()))))
    }

    fn parse(data: &str) -> PDFResult<PDFObject> {
        parser(data.as_bytes()).parse_object()
    }

    fn name(s: &str) -> PDFObject {
        PDFObject::Name(s.as_bytes().to_vec())
    }

    fn nested_dict() -> PDFObject {
        let mut inner = Dict::new();
        inner.insert(b"/Name".to_vec(), name("/Val"));

        let mut outer = Dict::new();
        outer.insert(b"/Name".to_vec(), PDFObject::Dictionary(inner));
        outer.insert(
            b"/Name1".to_vec(),
            PDFObject::Array(vec![
                PDFObject::Integer(1),
                PDFObject::Integer(2),
                PDFObject::Integer(3),
            ]),
        );
        PDFObject::Dictionary(outer)
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("1").unwrap(), PDFObject::Integer(1));
        assert_eq!(parse("-2.5").unwrap(), PDFObject::Real(-2.5));
        assert_eq!(parse("true").unwrap(), PDFObject::Boolean(true));
        assert_eq!(parse("null").unwrap(), PDFObject::Null);
        assert_eq!(parse("(abc)").unwrap(), PDFObject::String(b"abc".to_vec()));
        assert_eq!(parse("/Type").unwrap(), name("/Type"));
    }

    #[test]
    fn test_parse_empty_containers() {
        assert_eq!(parse("[]").unwrap(), PDFObject::Array(vec![]));
        assert_eq!(parse("<<>>").unwrap(), PDFObject::Dictionary(Dict::new()));
    }

    #[test]
    fn test_parse_nested_dict() {
        assert_eq!(
            parse("<</Name <</Name /Val>> /Name1 [1 2 3]>>").unwrap(),
            nested_dict()
        );
    }

    #[test]
    fn test_indirect_wrapper_is_transparent() {
        assert_eq!(
            parse("0 1 obj <</Name <</Name /Val>> /Name1 [1 2 3]>> endobj").unwrap(),
            nested_dict()
        );
    }

    #[test]
    fn test_parse_indirect_object_keeps_header() {
        let mut parser = parser(b"12 3 obj (body) endobj");
        let indirect = parser.parse_indirect_object().unwrap();
        assert_eq!(indirect.reference, Ref::new(12, 3));
        assert_eq!(indirect.object, PDFObject::String(b"body".to_vec()));
    }

    #[test]
    fn test_sequential_objects() {
        let mut parser = parser(b"1 2 3 [4] /Five");
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(1));
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(2));
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(3));
        assert_eq!(
            parser.parse_object().unwrap(),
            PDFObject::Array(vec![PDFObject::Integer(4)])
        );
        assert_eq!(parser.parse_object().unwrap(), name("/Five"));
        assert!(matches!(
            parser.parse_object(),
            Err(PDFError::UnexpectedEndOfInput)
        ));
    }

    #[test]
    fn test_object_survives_bad_token_after_it() {
        let mut parser = parser(b"(a) (b) 99999999999999999999");
        assert_eq!(parser.parse_object().unwrap(), PDFObject::String(b"a".to_vec()));
        assert_eq!(parser.parse_object().unwrap(), PDFObject::String(b"b".to_vec()));
        assert!(matches!(
            parser.parse_object(),
            Err(PDFError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_integer_survives_bad_token_in_lookahead() {
        let mut parser = parser(b"1 2 99999999999999999999");
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(1));
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(2));
        assert!(matches!(
            parser.parse_object(),
            Err(PDFError::InvalidNumber(_))
        ));

        let mut short = self::parser(b"1 99999999999999999999");
        assert_eq!(short.parse_object().unwrap(), PDFObject::Integer(1));
        assert!(short.parse_object().is_err());
    }

    #[test]
    fn test_seek_drops_held_back_error() {
        let mut parser = parser(b"7 99999999999999999999");
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(7));
        assert_eq!(parser.parse_object_at(0).unwrap(), PDFObject::Integer(7));
    }

    #[test]
    fn test_parse_references() {
        assert_eq!(
            parse("5 0 R").unwrap(),
            PDFObject::Ref(Ref::new(5, 0))
        );
        assert_eq!(
            parse("[1 0 R 2 [3 1 R]]").unwrap(),
            PDFObject::Array(vec![
                PDFObject::Ref(Ref::new(1, 0)),
                PDFObject::Integer(2),
                PDFObject::Array(vec![PDFObject::Ref(Ref::new(3, 1))]),
            ])
        );

        let mut expected = Dict::new();
        expected.insert(b"/Root".to_vec(), PDFObject::Ref(Ref::new(1, 0)));
        expected.insert(b"/Size".to_vec(), PDFObject::Integer(6));
        assert_eq!(
            parse("<< /Root 1 0 R /Size 6 >>").unwrap(),
            PDFObject::Dictionary(expected)
        );
    }

    #[test]
    fn test_reference_followed_by_object() {
        let mut parser = parser(b"4 0 R 7");
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Ref(Ref::new(4, 0)));
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(7));
    }

    #[test]
    fn test_negative_operands_are_not_references() {
        assert!(matches!(
            parse("[-1 0 R]"),
            Err(PDFError::InvalidObject(_))
        ));

        let mut parser = parser(b"-1 0 R");
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(-1));
        assert_eq!(parser.parse_object().unwrap(), PDFObject::Integer(0));
    }

    #[test]
    fn test_unmatched_close() {
        assert!(matches!(parse("]"), Err(PDFError::InvalidObject(_))));
        assert!(matches!(parse(">>"), Err(PDFError::InvalidObject(_))));
        assert!(matches!(parse("<< ]"), Err(PDFError::InvalidObject(_))));
        assert!(matches!(parse("[ >>"), Err(PDFError::InvalidObject(_))));
    }

    #[test]
    fn test_dict_key_must_be_name() {
        assert!(matches!(
            parse("<< 1 /Value >>"),
            Err(PDFError::InvalidObject(_))
        ));
        assert!(matches!(
            parse("<< /Lonely >>"),
            Err(PDFError::InvalidObject(_))
        ));
    }

    #[test]
    fn test_braces_are_not_objects() {
        assert!(matches!(parse("[{}]"), Err(PDFError::InvalidObject(_))));
    }

    #[test]
    fn test_unterminated_structure() {
        assert!(matches!(
            parse("[1 2"),
            Err(PDFError::UnexpectedEndOfInput)
        ));
        assert!(matches!(
            parse("<< /A (unterminated"),
            Err(PDFError::UnexpectedEndOfInput)
        ));
        assert!(matches!(parse(""), Err(PDFError::UnexpectedEndOfInput)));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let object = parse("<< /A 1 /B 2 /A 3 >>").unwrap();
        let dict = object.as_dict().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(b"/A".as_slice()), Some(&PDFObject::Integer(3)));
        assert_eq!(dict.keys().next().map(Vec::as_slice), Some(b"/A".as_slice()));
    }

    #[test]
    fn test_non_utf8_keys_stay_distinct() {
        let object = parse("<< /A#E9 1 /A#E8 2 >>").unwrap();
        let dict = object.as_dict().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(b"/A\xE9".as_slice()), Some(&PDFObject::Integer(1)));
        assert_eq!(dict.get(b"/A\xE8".as_slice()), Some(&PDFObject::Integer(2)));
    }

    #[test]
    fn test_dict_preserves_declaration_order() {
        let object = parse("<< /Z 1 /Y 2 /X 3 >>").unwrap();
        let keys: Vec<&[u8]> = object
            .as_dict()
            .unwrap()
            .keys()
            .map(Vec::as_slice)
            .collect();
        assert_eq!(keys, [b"/Z".as_slice(), b"/Y".as_slice(), b"/X".as_slice()]);
    }

    #[test]
    fn test_malformed_indirect_header() {
        let mut parser = parser(b"1 obj 2 endobj");
        assert!(matches!(
            parser.parse_indirect_object(),
            Err(PDFError::InvalidIndirectObject(_))
        ));
    }

    #[test]
    fn test_missing_endobj() {
        assert!(matches!(
            parse("1 0 obj 42 trailer"),
            Err(PDFError::InvalidIndirectObject(_))
        ));
    }

    #[test]
    fn test_flate_stream() {
        let payload = deflate(b"BT /F1 24 Tf ET");
        let mut data = format!(
            "7 0 obj\n<< /Length {} /Filter /FlateDecode >>\nstream\n",
            payload.len()
        )
        .into_bytes();
        data.extend_from_slice(&payload);
        data.extend_from_slice(b"\nendstream\nendobj\n");

        let object = parser(&data).parse_object().unwrap();
        match object {
            PDFObject::Stream { dict, data } => {
                assert_eq!(dict.get(b"/Filter".as_slice()), Some(&name("/FlateDecode")));
                assert_eq!(data, b"BT /F1 24 Tf ET");
            }
            other => panic!("expected a stream, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_with_indirect_length() {
        let payload = deflate(b"q Q");
        let mut data =
            b"3 0 obj << /Length 9 0 R /Filter /FlateDecode >> stream\r\n".to_vec();
        data.extend_from_slice(&payload);
        data.extend_from_slice(b"\r\nendstream endobj");

        let object = parser(&data).parse_object().unwrap();
        assert!(matches!(object, PDFObject::Stream { ref data, .. } if data == b"q Q"));
    }

    #[test]
    fn test_unsupported_stream_filter() {
        assert!(matches!(
            parse("1 0 obj << /Filter /LZWDecode >> stream\nabc\nendstream endobj"),
            Err(PDFError::UnsupportedFilter(_))
        ));
    }

    #[test]
    fn test_stream_without_filter() {
        let input = "1 0 obj << /Length 3 >> stream\nabc\nendstream endobj";
        assert!(matches!(
            parse(input),
            Err(PDFError::InvalidDecodeConfig(_))
        ));

        let options = ParserOptions {
            allow_unfiltered_streams: true,
            ..ParserOptions::default()
        };
        let lexer = Lexer::new(Box::new(Stream::from_bytes(input.as_bytes().to_vec())));
        let object = Parser::with_options(lexer, options).parse_object().unwrap();
        assert!(matches!(object, PDFObject::Stream { ref data, .. } if data == b"abc"));
    }

    #[test]
    fn test_stream_requires_dictionary() {
        assert!(matches!(
            parse("1 0 obj [1] stream\nabc\nendstream endobj"),
            Err(PDFError::InvalidIndirectObject(_))
        ));
    }

    #[test]
    fn test_stream_requires_endobj() {
        let payload = deflate(b"x");
        let mut data = format!("1 0 obj << /Length {} /Filter /FlateDecode >> stream\n", payload.len())
            .into_bytes();
        data.extend_from_slice(&payload);
        data.extend_from_slice(b"\nendstream\n2 0 obj");

        assert!(matches!(
            parser(&data).parse_object(),
            Err(PDFError::InvalidIndirectObject(_))
        ));
    }

    #[test]
    fn test_parse_object_at() {
        let data = b"1 0 obj (first) endobj 2 0 obj (second) endobj";
        let mut parser = parser(data);

        assert_eq!(
            parser.parse_object_at(23).unwrap(),
            PDFObject::String(b"second".to_vec())
        );
        assert_eq!(
            parser.parse_object_at(0).unwrap(),
            PDFObject::String(b"first".to_vec())
        );
    }

    #[test]
    fn test_push_back_order() {
        let mut parser = parser(b"3");
        parser.push_back(Token::Integer(2));
        parser.push_back(Token::Integer(1));
        assert_eq!(parser.next_token().unwrap(), Token::Integer(1));
        assert_eq!(parser.next_token().unwrap(), Token::Integer(2));
        assert_eq!(parser.next_token().unwrap(), Token::Integer(3));
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 10_000;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let mut object = parse(&input).unwrap();

        let mut levels = 0;
        while let PDFObject::Array(mut items) = object {
            levels += 1;
            object = items.pop().unwrap_or(PDFObject::Null);
        }
        assert_eq!(levels, depth);
    }
}
