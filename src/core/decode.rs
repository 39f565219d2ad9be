/// Stream decoding and decompression utilities.
///
/// A stream's parameter dictionary names its filter in `/Filter`. The name is
/// looked up in a static table mapping each recognized filter to either a
/// decoder function or nothing; a filter without a decoder is a fatal
/// `UnsupportedFilter` error, never a pass-through.
use super::error::{PDFError, PDFResult};
use super::object::Dict;
use flate2::read::ZlibDecoder;
use std::fmt;
use std::io::Read;

type DecodeFn = fn(&[u8]) -> PDFResult<Vec<u8>>;

/// Stream filters recognized in `/Filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    FlateDecode,
    ASCIIHexDecode,
    ASCII85Decode,
    LZWDecode,
    RunLengthDecode,
    CCITTFaxDecode,
    DCTDecode,
}

struct FilterEntry {
    name: &'static str,
    kind: FilterKind,
    decoder: Option<DecodeFn>,
}

static FILTERS: [FilterEntry; 7] = [
    FilterEntry {
        name: "/FlateDecode",
        kind: FilterKind::FlateDecode,
        decoder: Some(decode_flate),
    },
    FilterEntry {
        name: "/ASCIIHexDecode",
        kind: FilterKind::ASCIIHexDecode,
        decoder: None,
    },
    FilterEntry {
        name: "/ASCII85Decode",
        kind: FilterKind::ASCII85Decode,
        decoder: None,
    },
    FilterEntry {
        name: "/LZWDecode",
        kind: FilterKind::LZWDecode,
        decoder: None,
    },
    FilterEntry {
        name: "/RunLengthDecode",
        kind: FilterKind::RunLengthDecode,
        decoder: None,
    },
    FilterEntry {
        name: "/CCITTFaxDecode",
        kind: FilterKind::CCITTFaxDecode,
        decoder: None,
    },
    FilterEntry {
        name: "/DCTDecode",
        kind: FilterKind::DCTDecode,
        decoder: None,
    },
];

impl FilterKind {
    // FILTERS rows are in variant declaration order
    fn entry(self) -> &'static FilterEntry {
        &FILTERS[self as usize]
    }

    /// Looks up a filter by its name, including the leading `/`.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        FILTERS
            .iter()
            .find(|entry| entry.name.as_bytes() == name)
            .map(|entry| entry.kind)
    }

    /// Returns the filter's name as written in a PDF file.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Returns true if data using this filter can be decoded.
    pub fn is_supported(self) -> bool {
        self.entry().decoder.is_some()
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a stream's payload is to be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    pub filter: FilterKind,
}

impl DecodeConfig {
    /// Derives the configuration from a stream's parameter dictionary.
    ///
    /// `/Filter` must be present and be the Name of a recognized filter.
    pub fn from_dict(dict: &Dict) -> PDFResult<Self> {
        let filter = dict
            .get(b"/Filter".as_slice())
            .ok_or_else(|| PDFError::InvalidDecodeConfig("missing /Filter".to_string()))?;

        let name = filter.as_name().ok_or_else(|| {
            PDFError::InvalidDecodeConfig(format!("/Filter is a {}, not a name", filter.kind()))
        })?;

        let filter = FilterKind::from_name(name).ok_or_else(|| {
            PDFError::InvalidDecodeConfig(format!(
                "unknown filter {}",
                String::from_utf8_lossy(name)
            ))
        })?;

        Ok(DecodeConfig { filter })
    }

    /// Decodes `data` with the configured filter.
    pub fn decode(&self, data: &[u8]) -> PDFResult<Vec<u8>> {
        match self.filter.entry().decoder {
            Some(decoder) => decoder(data),
            None => Err(PDFError::UnsupportedFilter(self.filter.name().to_string())),
        }
    }
}

/// Decodes a FlateDecode (zlib/deflate) compressed stream.
///
/// # Example
/// ```
/// use flate2::Compression;
/// use flate2::write::ZlibEncoder;
/// use pdf_syntax::core::decode::decode_flate;
/// use std::io::Write;
///
/// let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
/// encoder.write_all(b"BT /F1 12 Tf ET").unwrap();
/// let compressed = encoder.finish().unwrap();
///
/// assert_eq!(decode_flate(&compressed).unwrap(), b"BT /F1 12 Tf ET");
/// ```
pub fn decode_flate(compressed_data: &[u8]) -> PDFResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(compressed_data);
    let mut decompressed = Vec::new();

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PDFError::DecodeFailure(format!("FlateDecode: {}", e)))?;

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PDFObject;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn dict_with_filter(filter: PDFObject) -> Dict {
        let mut dict = Dict::new();
        dict.insert(b"/Filter".to_vec(), filter);
        dict
    }

    #[test]
    fn test_decode_flate() {
        let original = b"Hello, PDF world!";
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(original).unwrap();
        let compressed = encoder.finish().unwrap();

        let decompressed = decode_flate(&compressed).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_decode_flate_garbage() {
        assert!(matches!(
            decode_flate(b"definitely not zlib"),
            Err(PDFError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_every_filter_has_one_entry() {
        for entry in &FILTERS {
            assert_eq!(FilterKind::from_name(entry.name.as_bytes()), Some(entry.kind));
            assert_eq!(entry.kind.name(), entry.name);
        }
        assert!(FilterKind::FlateDecode.is_supported());
        assert!(!FilterKind::DCTDecode.is_supported());
    }

    #[test]
    fn test_config_from_dict() {
        let dict = dict_with_filter(PDFObject::Name(b"/FlateDecode".to_vec()));
        let config = DecodeConfig::from_dict(&dict).unwrap();
        assert_eq!(config.filter, FilterKind::FlateDecode);
    }

    #[test]
    fn test_config_missing_filter() {
        assert!(matches!(
            DecodeConfig::from_dict(&Dict::new()),
            Err(PDFError::InvalidDecodeConfig(_))
        ));
    }

    #[test]
    fn test_config_unknown_or_non_name_filter() {
        let unknown = dict_with_filter(PDFObject::Name(b"/JBIG2Decode".to_vec()));
        assert!(matches!(
            DecodeConfig::from_dict(&unknown),
            Err(PDFError::InvalidDecodeConfig(_))
        ));

        let not_a_name = dict_with_filter(PDFObject::Integer(1));
        assert!(matches!(
            DecodeConfig::from_dict(&not_a_name),
            Err(PDFError::InvalidDecodeConfig(_))
        ));
    }

    #[test]
    fn test_unsupported_filter_is_fatal() {
        let config = DecodeConfig {
            filter: FilterKind::LZWDecode,
        };
        match config.decode(b"\x80\x0b\x60\x50") {
            Err(PDFError::UnsupportedFilter(name)) => assert_eq!(name, "/LZWDecode"),
            other => panic!("expected UnsupportedFilter, got {:?}", other),
        }
    }
}
