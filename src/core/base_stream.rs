use super::error::PDFResult;

/// Byte-seekable source the lexer reads from.
///
/// Implementations provide positioned single-byte and multi-byte reads over
/// memory or any seekable reader. Running past the end is reported as
/// `PDFError::UnexpectedEndOfStream`; any other error is a failure of the
/// underlying source.
pub trait BaseStream {
    /// Returns the total length of the stream in bytes.
    fn length(&self) -> usize;

    /// Returns the current position in the stream.
    fn pos(&self) -> usize;

    /// Sets the current position in the stream.
    fn set_pos(&mut self, pos: usize) -> PDFResult<()>;

    /// Reads and returns a single byte from the stream, advancing the position.
    fn get_byte(&mut self) -> PDFResult<u8>;

    /// Reads the specified number of bytes from the stream, advancing the position.
    ///
    /// Fails without moving the position if fewer than `length` bytes remain.
    fn get_bytes(&mut self, length: usize) -> PDFResult<Vec<u8>>;

    /// Returns true if the stream contains no data.
    fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Reads a single byte without advancing the position.
    fn peek_byte(&mut self) -> PDFResult<u8> {
        let current_pos = self.pos();
        let byte = self.get_byte()?;
        self.set_pos(current_pos)?;
        Ok(byte)
    }

    /// Reads the specified number of bytes without advancing the position.
    fn peek_bytes(&mut self, length: usize) -> PDFResult<Vec<u8>> {
        let current_pos = self.pos();
        let bytes = self.get_bytes(length)?;
        self.set_pos(current_pos)?;
        Ok(bytes)
    }

    /// Rewinds the stream to its first byte.
    fn reset(&mut self) -> PDFResult<()> {
        self.set_pos(0)
    }
}
