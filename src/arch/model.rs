use crate::{Result, tensor::Tensor};

/// A pipeline of layers that can be loaded from a flat parameter buffer and evaluated.
pub trait Model {
    /// Input consumed by a forward pass.
    type Input: ?Sized;

    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Loads every layer's parameters from `buf`, in layer order.
    ///
    /// Loading is all-or-nothing: if `buf` is shorter than `self.size()` nothing is modified.
    ///
    /// # Arguments
    /// * `buf` - The model's parameters.
    ///
    /// # Returns
    /// The amount of values consumed.
    fn load(&mut self, buf: &[f32]) -> Result<usize>;

    /// Makes a forward pass through the model.
    ///
    /// # Arguments
    /// * `x` - The input data.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    fn forward(&self, x: &Self::Input) -> Result<Tensor>;
}
