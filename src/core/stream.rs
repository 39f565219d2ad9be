use super::base_stream::BaseStream;
use super::error::{PDFError, PDFResult};
use std::sync::Arc;

/// A simple in-memory stream implementation.
///
/// Holds the whole PDF body in memory. The underlying data is stored in an
/// Arc, so several streams (one per concurrent parse) can share one buffer
/// while each keeps its own cursor.
#[derive(Debug, Clone)]
pub struct Stream {
    /// The underlying byte buffer (shared via Arc)
    bytes: Arc<Vec<u8>>,
    /// Current read position
    pos: usize,
}

impl Stream {
    /// Creates a new Stream from a byte vector.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_arc(Arc::new(bytes))
    }

    /// Creates a new Stream over an already shared buffer.
    pub fn from_arc(bytes: Arc<Vec<u8>>) -> Self {
        Stream { bytes, pos: 0 }
    }

    /// Returns a reference to the underlying byte buffer.
    pub fn get_bytes_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl BaseStream for Stream {
    fn length(&self) -> usize {
        self.bytes.len()
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn set_pos(&mut self, pos: usize) -> PDFResult<()> {
        if pos > self.bytes.len() {
            return Err(PDFError::InvalidPosition {
                pos,
                length: self.bytes.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    fn get_byte(&mut self) -> PDFResult<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(PDFError::UnexpectedEndOfStream)?;
        self.pos += 1;
        Ok(byte)
    }

    fn get_bytes(&mut self, length: usize) -> PDFResult<Vec<u8>> {
        let end_pos = self
            .pos
            .checked_add(length)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(PDFError::UnexpectedEndOfStream)?;

        let bytes = self.bytes[self.pos..end_pos].to_vec();
        self.pos = end_pos;
        Ok(bytes)
    }
}
