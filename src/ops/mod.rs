//! Stateless tensor primitives backing the spatial layers.
//!
//! Every function here works on (batch, channels, height, width) tensors and spreads the work
//! across channels with rayon.

mod conv;
mod pool;

pub use conv::{conv2d, conv_output_size};
pub use pool::{maxpool, upsample};
