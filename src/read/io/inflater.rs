// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::{Result, ZipError};

use flate2::{Decompress, FlushDecompress, Status};

/// A raw deflate decompressor fed with explicit input chunks.
///
/// The wrapper keeps the streaming contract the entry reader relies on: input is handed over in
/// chunks with [`Inflater::set_input`], output is pulled with [`Inflater::inflate`], and
/// [`Inflater::bytes_read`] reports how many compressed bytes were actually consumed so the
/// reader can recover bytes it pulled from the source past the end of the stream.
pub(crate) struct Inflater {
    decompress: Decompress,
    input: Vec<u8>,
    position: usize,
    finished: bool,
}

impl Inflater {
    pub(crate) fn new() -> Self {
        // No zlib wrapper; ZIP entries carry a bare RFC 1951 stream.
        Self { decompress: Decompress::new(false), input: Vec::new(), position: 0, finished: false }
    }

    /// Whether the current input chunk has been fully consumed.
    pub(crate) fn needs_input(&self) -> bool {
        self.position == self.input.len()
    }

    /// Whether the end of the deflate stream has been reached.
    pub(crate) fn finished(&self) -> bool {
        self.finished
    }

    /// The total number of compressed bytes consumed since construction or the last reset.
    pub(crate) fn bytes_read(&self) -> u64 {
        self.decompress.total_in()
    }

    /// Supplies the next chunk of compressed input.
    ///
    /// Must only be called once the previous chunk reports [`Inflater::needs_input`]; bytes still
    /// pending would otherwise be dropped and the consumed-byte accounting lost with them.
    pub(crate) fn set_input(&mut self, data: &[u8]) {
        debug_assert!(self.needs_input());

        self.input.clear();
        self.input.extend_from_slice(data);
        self.position = 0;
    }

    /// Decompresses into `buffer`, returning the number of bytes produced.
    ///
    /// A return value of zero means either the stream has finished or another input chunk is
    /// required; the caller distinguishes the two via [`Inflater::finished`].
    pub(crate) fn inflate(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if self.finished || buffer.is_empty() {
            return Ok(0);
        }

        let consumed_before = self.decompress.total_in();
        let produced_before = self.decompress.total_out();

        let status = self
            .decompress
            .decompress(&self.input[self.position..], buffer, FlushDecompress::None)
            .map_err(|err| ZipError::CorruptDeflateStream(err.to_string()))?;

        self.position += (self.decompress.total_in() - consumed_before) as usize;
        if let Status::StreamEnd = status {
            self.finished = true;
        }

        Ok((self.decompress.total_out() - produced_before) as usize)
    }

    /// Resets the decompressor so it can be reused for the next entry.
    pub(crate) fn reset(&mut self) {
        self.decompress.reset(false);
        self.input.clear();
        self.position = 0;
        self.finished = false;
    }
}
