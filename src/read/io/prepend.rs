// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::io::AsyncRead;
use pin_project::pin_project;

/// A wrapping reader which supports returning already-read bytes to the front of the stream.
///
/// Returned bytes are yielded again by subsequent reads before any fresh bytes are pulled from the
/// inner reader. The reader over a ZIP stream regularly pulls whole buffers from the source and
/// only afterwards learns where the current entry ended; [`PrependReader::prepend`] is how the
/// excess is handed back so the next entry's header can be read from the right position.
#[pin_project]
pub(crate) struct PrependReader<R> {
    #[pin]
    reader: R,
    buffer: Vec<u8>,
    position: usize,
}

impl<R> PrependReader<R> {
    /// Constructs a new wrapping reader with an empty prepend buffer.
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, buffer: Vec::new(), position: 0 }
    }

    /// Returns the provided bytes to the front of the stream.
    ///
    /// Bytes already pending keep their order and are yielded after the newly returned ones, so a
    /// caller may prepend in several steps as long as it works backwards through the stream.
    pub(crate) fn prepend(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        let mut pending = Vec::with_capacity(bytes.len() + self.buffer.len() - self.position);
        pending.extend_from_slice(bytes);
        pending.extend_from_slice(&self.buffer[self.position..]);

        self.buffer = pending;
        self.position = 0;
    }

    /// Consumes this reader and returns the inner value.
    ///
    /// Any bytes still pending in the prepend buffer are discarded.
    pub(crate) fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> AsyncRead for PrependReader<R>
where
    R: AsyncRead + Unpin,
{
    fn poll_read(self: Pin<&mut Self>, c: &mut Context<'_>, b: &mut [u8]) -> Poll<std::io::Result<usize>> {
        let project = self.project();

        if *project.position < project.buffer.len() {
            let pending = &project.buffer[*project.position..];
            let count = pending.len().min(b.len());
            b[..count].copy_from_slice(&pending[..count]);
            *project.position += count;

            if *project.position == project.buffer.len() {
                project.buffer.clear();
                *project.position = 0;
            }

            return Poll::Ready(Ok(count));
        }

        project.reader.poll_read(c, b)
    }
}
