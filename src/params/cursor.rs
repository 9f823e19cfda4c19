use crate::{Result, arch::layers::Layer};

/// Walks a shared parameter buffer, handing each layer the values that follow the previous one.
pub struct ParamCursor<'b> {
    buf: &'b [f32],
    offset: usize,
}

impl<'b> ParamCursor<'b> {
    /// Creates a new `ParamCursor` positioned at the start of `buf`.
    pub fn new(buf: &'b [f32]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Returns the amount of values consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the amount of values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Loads the next layer's parameters and advances past them.
    ///
    /// # Arguments
    /// * `layer` - The layer to load.
    ///
    /// # Returns
    /// The amount of values the layer consumed, or an error if the buffer ran out. The cursor
    /// doesn't move on error.
    pub fn load(&mut self, layer: &mut Layer) -> Result<usize> {
        let n = layer.load(self.buf, self.offset)?;
        self.offset += n;
        Ok(n)
    }
}
