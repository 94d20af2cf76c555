//! Byte sinks the column writers append to.
//!
//! A sink only has to append bytes and report how many it has taken so far.
//! Positions recorded in the chunk index and the string back-pointer are
//! sink positions, so a host writer that shares one sink across columns gets
//! file-relative offsets for free.

use std::io::Write;

use eyre::{Result, WrapErr};

pub trait OutputSink {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Total bytes appended so far.
    fn write_pos(&self) -> usize;
}

impl OutputSink for Vec<u8> {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn write_pos(&self) -> usize {
        self.len()
    }
}

/// Adapts any `io::Write` into an [`OutputSink`], counting bytes written.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    inner: W,
    pos: usize,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, pos: 0 }
    }

    /// Starts counting from `pos`, for streams that already hold data.
    pub fn with_position(inner: W, pos: usize) -> Self {
        Self { inner, pos }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .wrap_err_with(|| format!("failed to flush sink at position {}", self.pos))
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> OutputSink for StreamSink<W> {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes).wrap_err_with(|| {
            format!(
                "failed to write {} bytes at sink position {}",
                bytes.len(),
                self.pos
            )
        })?;
        self.pos += bytes.len();
        Ok(())
    }

    fn write_pos(&self) -> usize {
        self.pos
    }
}
