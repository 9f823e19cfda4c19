//! A small feed-forward inference engine.
//!
//! Models are ordered lists of [`Layer`]s built from configuration through the [`Registry`],
//! loaded once from a flat `f32` parameter buffer (every layer takes its weights and then its
//! bias, in layer order) and then evaluated.
//!
//! ```ignore
//! use cnn_inference::{Model, ModelConfig, Registry, Sequential, params};
//!
//! let config = ModelConfig::from_file("model.json")?;
//! let mut model = Sequential::from_config(&config, &Registry::default())?;
//! model.load(&params::read_file("weights.bin")?)?;
//! let y = model.forward(&x)?;
//! ```

pub mod arch;
pub mod config;
pub mod error;
pub mod ops;
pub mod params;
pub mod tensor;

pub use arch::{
    FanIn, Model, Registry, Sequential,
    layers::{Layer, ParamShape},
};
pub use config::{LayerSpec, ModelConfig};
pub use error::{InferenceErr, Result};
pub use tensor::Tensor;
