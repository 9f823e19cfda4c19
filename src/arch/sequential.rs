use std::ops::Range;

use log::{debug, trace, warn};
use ndarray::ArrayViewD;

use super::{Model, Registry, layers::Layer};
use crate::{InferenceErr, Result, config::ModelConfig, params::ParamCursor, tensor::Tensor};

/// A sequential model: each layer's output is the next layer's input.
#[derive(Debug, Clone, Default)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// Builds a `Sequential` from its configuration.
    ///
    /// # Arguments
    /// * `config` - The model configuration.
    /// * `registry` - The registry used to resolve each layer's type.
    ///
    /// # Returns
    /// The zero-initialized model, or the first construction error.
    pub fn from_config(config: &ModelConfig, registry: &Registry) -> Result<Self> {
        let layers = config
            .layers
            .iter()
            .map(|spec| registry.build(spec))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the range of the parameter buffer owned by each layer.
    ///
    /// Layers without parameters get an empty range at the current offset.
    pub fn layout(&self) -> Vec<Range<usize>> {
        let mut offset = 0;

        self.layers
            .iter()
            .map(|layer| {
                let start = offset;
                offset += layer.size();
                start..offset
            })
            .collect()
    }

    /// Loads every layer from `cursor`, leaving it right after the last one.
    ///
    /// Unlike `Model::load` there's no pre-flight check, callers sharing a cursor between
    /// several models are expected to check the total size first.
    pub fn load_from(&mut self, cursor: &mut ParamCursor) -> Result<usize> {
        let start = cursor.offset();

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let offset = cursor.offset();
            let n = cursor.load(layer)?;
            debug!("layer {i} ({}) loaded {n} params at offset {offset}", layer.name());
        }

        Ok(cursor.offset() - start)
    }

    /// Makes a forward pass whose first layer takes several inputs.
    ///
    /// # Arguments
    /// * `xs` - The ordered inputs of the first layer.
    ///
    /// # Returns
    /// The prediction for the given inputs or an error if occurred.
    pub fn forward_many(&self, xs: &[Tensor]) -> Result<Tensor> {
        let Some((first, rest)) = self.layers.split_first() else {
            return Err(InferenceErr::MisconfiguredLayer {
                layer: "sequential",
                reason: "an empty model can't take a sequence of inputs",
            });
        };

        let views: Vec<ArrayViewD<f32>> = xs.iter().map(|x| x.view()).collect();
        let x = first.forward_many(&views)?;
        trace!("layer 0 ({}) -> {:?}", first.name(), x.shape());

        Self::thread(rest, 1, x)
    }

    fn thread(layers: &[Layer], first_index: usize, mut x: Tensor) -> Result<Tensor> {
        for (i, layer) in layers.iter().enumerate() {
            x = layer.forward(x.view())?;
            trace!("layer {} ({}) -> {:?}", first_index + i, layer.name(), x.shape());
        }

        Ok(x)
    }
}

impl Model for Sequential {
    type Input = Tensor;

    fn size(&self) -> usize {
        self.layers.iter().map(Layer::size).sum()
    }

    fn load(&mut self, buf: &[f32]) -> Result<usize> {
        let required = self.size();
        if buf.len() < required {
            return Err(InferenceErr::InsufficientBuffer {
                required,
                available: buf.len(),
            });
        }

        let mut cursor = ParamCursor::new(buf);
        let consumed = self.load_from(&mut cursor)?;

        if cursor.remaining() > 0 {
            warn!(
                "parameter buffer has {} trailing values after {consumed} were loaded",
                cursor.remaining()
            );
        }

        Ok(consumed)
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let Some((first, rest)) = self.layers.split_first() else {
            return Ok(x.clone());
        };

        let y = first.forward(x.view())?;
        trace!("layer 0 ({}) -> {:?}", first.name(), y.shape());

        Self::thread(rest, 1, y)
    }
}
