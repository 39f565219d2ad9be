use super::base_stream::BaseStream;
use super::error::{PDFError, PDFResult};
use lru::LruCache;
use std::io::{self, Read, Seek, SeekFrom};
use std::num::NonZeroUsize;

/// Default chunk size (64KB)
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Default number of chunks kept in memory
pub const DEFAULT_MAX_CACHED_CHUNKS: usize = 10;

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(DEFAULT_MAX_CACHED_CHUNKS).unwrap();

/// A stream over any seekable reader, typically a `std::fs::File`.
///
/// Data is fetched in fixed-size chunks on demand and the most recently used
/// chunks are kept in an LRU cache, so the whole source never has to be in
/// memory. The reader is owned exclusively: one `ReaderStream` per parse.
pub struct ReaderStream<R: Read + Seek> {
    reader: R,
    cache: LruCache<usize, Vec<u8>>,
    chunk_size: usize,
    total_length: usize,
    pos: usize,
}

impl<R: Read + Seek> ReaderStream<R> {
    /// Creates a stream with the default chunk size and cache capacity.
    pub fn new(reader: R) -> PDFResult<Self> {
        Self::with_chunking(reader, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CACHED_CHUNKS)
    }

    /// Creates a stream with an explicit chunk size and cache capacity.
    ///
    /// Zero values fall back to the defaults.
    pub fn with_chunking(
        mut reader: R,
        chunk_size: usize,
        max_cached_chunks: usize,
    ) -> PDFResult<Self> {
        let end = reader.seek(SeekFrom::End(0))?;
        let total_length = usize::try_from(end).map_err(|_| {
            PDFError::Io(io::Error::other(format!(
                "source of {} bytes is not addressable",
                end
            )))
        })?;
        reader.seek(SeekFrom::Start(0))?;

        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        let capacity = NonZeroUsize::new(max_cached_chunks).unwrap_or(DEFAULT_CACHE_CAPACITY);

        Ok(ReaderStream {
            reader,
            cache: LruCache::new(capacity),
            chunk_size,
            total_length,
            pos: 0,
        })
    }

    /// Returns chunk `chunk_num`, loading it from the reader on a miss.
    fn chunk(&mut self, chunk_num: usize) -> PDFResult<&Vec<u8>> {
        if !self.cache.contains(&chunk_num) {
            let chunk_start = chunk_num * self.chunk_size;
            let chunk_end = (chunk_start + self.chunk_size).min(self.total_length);

            self.reader.seek(SeekFrom::Start(chunk_start as u64))?;
            let mut buffer = vec![0u8; chunk_end - chunk_start];
            self.reader.read_exact(&mut buffer)?;

            self.cache.put(chunk_num, buffer);
        }

        self.cache
            .get(&chunk_num)
            .ok_or(PDFError::UnexpectedEndOfStream)
    }

    /// Returns the number of chunks currently cached.
    pub fn cached_chunks(&self) -> usize {
        self.cache.len()
    }
}

impl<R: Read + Seek> BaseStream for ReaderStream<R> {
    fn length(&self) -> usize {
        self.total_length
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn set_pos(&mut self, pos: usize) -> PDFResult<()> {
        if pos > self.total_length {
            return Err(PDFError::InvalidPosition {
                pos,
                length: self.total_length,
            });
        }
        self.pos = pos;
        Ok(())
    }

    fn get_byte(&mut self) -> PDFResult<u8> {
        if self.pos >= self.total_length {
            return Err(PDFError::UnexpectedEndOfStream);
        }

        let chunk_size = self.chunk_size;
        let pos = self.pos;
        let byte = self.chunk(pos / chunk_size)?[pos % chunk_size];
        self.pos += 1;
        Ok(byte)
    }

    fn get_bytes(&mut self, length: usize) -> PDFResult<Vec<u8>> {
        let end_pos = self
            .pos
            .checked_add(length)
            .filter(|end| *end <= self.total_length)
            .ok_or(PDFError::UnexpectedEndOfStream)?;

        let mut bytes = Vec::with_capacity(length);
        let mut cursor = self.pos;
        while cursor < end_pos {
            let chunk_size = self.chunk_size;
            let offset = cursor % chunk_size;
            let take = (chunk_size - offset).min(end_pos - cursor);
            let chunk = self.chunk(cursor / chunk_size)?;
            bytes.extend_from_slice(&chunk[offset..offset + take]);
            cursor += take;
        }

        self.pos = end_pos;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reports an end offset of `u64::MAX` and holds no data.
    struct Unbounded;

    impl Read for Unbounded {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl Seek for Unbounded {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            Ok(match pos {
                SeekFrom::End(_) => u64::MAX,
                _ => 0,
            })
        }
    }

    fn sample() -> Vec<u8> {
        (0u8..=255).cycle().take(1000).collect()
    }

    #[test]
    fn test_reads_across_chunks() {
        let data = sample();
        let mut stream = ReaderStream::with_chunking(Cursor::new(data.clone()), 64, 2).unwrap();

        assert_eq!(stream.length(), 1000);
        stream.set_pos(60).unwrap();
        assert_eq!(stream.get_bytes(10).unwrap(), data[60..70].to_vec());
        assert_eq!(stream.pos(), 70);
        assert_eq!(stream.get_byte().unwrap(), data[70]);
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut stream = ReaderStream::with_chunking(Cursor::new(sample()), 16, 3).unwrap();

        for pos in (0..1000).step_by(16) {
            stream.set_pos(pos).unwrap();
            stream.get_byte().unwrap();
        }
        assert_eq!(stream.cached_chunks(), 3);
    }

    #[test]
    fn test_end_of_stream() {
        let mut stream = ReaderStream::new(Cursor::new(vec![1u8, 2])).unwrap();

        assert_eq!(stream.get_bytes(2).unwrap(), vec![1, 2]);
        assert!(matches!(
            stream.get_byte(),
            Err(PDFError::UnexpectedEndOfStream)
        ));
        assert!(matches!(
            stream.set_pos(3),
            Err(PDFError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_source_length_is_never_truncated() {
        match ReaderStream::new(Unbounded) {
            Ok(stream) => assert_eq!(u64::try_from(stream.length()).ok(), Some(u64::MAX)),
            Err(e) => assert!(matches!(e, PDFError::Io(_))),
        }
    }

    #[test]
    fn test_zero_chunking_falls_back_to_defaults() {
        let mut stream = ReaderStream::with_chunking(Cursor::new(sample()), 0, 0).unwrap();

        assert_eq!(stream.peek_byte().unwrap(), 0);
        assert_eq!(stream.cached_chunks(), 1);
    }
}
