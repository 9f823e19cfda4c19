use std::num::NonZeroUsize;

use ndarray::ArrayViewD;

use super::{Concatenate, Conv2d, Dense, Flatten, Maxpool, ReLU, Sigmoid, Softmax, UpSample};
use crate::{InferenceErr, Result, tensor::Tensor};

/// The hyperparameters a layer reports about its parameters.
///
/// For the pooling layers this is their stride/factor, they consume nothing from the
/// parameter buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    Dense {
        out_features: usize,
        in_features: usize,
    },
    Conv2d {
        out_channels: usize,
        in_channels: usize,
        kernel_size: usize,
        stride: usize,
    },
    Maxpool {
        stride: usize,
    },
    UpSample {
        factor: usize,
    },
}

impl ParamShape {
    /// Returns the amount of buffer values a layer with this shape consumes.
    pub fn count(&self) -> usize {
        match *self {
            ParamShape::Dense {
                out_features,
                in_features,
            } => out_features * in_features + out_features,
            ParamShape::Conv2d {
                out_channels,
                in_channels,
                kernel_size,
                ..
            } => out_channels * in_channels * kernel_size * kernel_size + out_channels,
            ParamShape::Maxpool { .. } | ParamShape::UpSample { .. } => 0,
        }
    }
}

/// A single inference step.
///
/// The set of layers is closed, every operation dispatches with one `match`. Layers are built
/// zero-initialized, loaded once from the parameter buffer and only read afterwards. There is no
/// backward pass.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(Dense),
    Conv2d(Conv2d),
    ReLU(ReLU),
    Flatten(Flatten),
    Sigmoid(Sigmoid),
    Softmax(Softmax),
    Maxpool(Maxpool),
    UpSample(UpSample),
    Concatenate(Concatenate),
}

impl Layer {
    pub fn dense(in_features: usize, out_features: usize) -> Self {
        Self::Dense(Dense::new(in_features, out_features))
    }

    pub fn conv(
        in_channels: usize,
        out_channels: usize,
        kernel_size: NonZeroUsize,
        stride: NonZeroUsize,
    ) -> Self {
        Self::Conv2d(Conv2d::new(in_channels, out_channels, kernel_size, stride))
    }

    pub fn relu() -> Self {
        Self::ReLU(ReLU::new())
    }

    pub fn flatten() -> Self {
        Self::Flatten(Flatten::new())
    }

    pub fn sigmoid() -> Self {
        Self::Sigmoid(Sigmoid::new())
    }

    pub fn softmax(axis: isize) -> Self {
        Self::Softmax(Softmax::new(axis))
    }

    pub fn maxpool(stride: NonZeroUsize) -> Self {
        Self::Maxpool(Maxpool::new(stride))
    }

    pub fn upsample(factor: NonZeroUsize) -> Self {
        Self::UpSample(UpSample::new(factor))
    }

    pub fn concat() -> Self {
        Self::Concatenate(Concatenate::new())
    }

    /// Returns the registry key of this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dense(_) => Dense::NAME,
            Self::Conv2d(_) => Conv2d::NAME,
            Self::ReLU(_) => ReLU::NAME,
            Self::Flatten(_) => Flatten::NAME,
            Self::Sigmoid(_) => Sigmoid::NAME,
            Self::Softmax(_) => Softmax::NAME,
            Self::Maxpool(_) => Maxpool::NAME,
            Self::UpSample(_) => UpSample::NAME,
            Self::Concatenate(_) => Concatenate::NAME,
        }
    }

    /// Returns the shape of this layer's parameters, `None` for layers without any.
    pub fn param_shape(&self) -> Option<ParamShape> {
        let shape = match self {
            Self::Dense(l) => {
                let (out_features, in_features) = l.dim();
                ParamShape::Dense {
                    out_features,
                    in_features,
                }
            }
            Self::Conv2d(l) => ParamShape::Conv2d {
                out_channels: l.out_channels(),
                in_channels: l.in_channels(),
                kernel_size: l.kernel_size(),
                stride: l.stride(),
            },
            Self::Maxpool(l) => ParamShape::Maxpool { stride: l.stride() },
            Self::UpSample(l) => ParamShape::UpSample {
                factor: l.factor(),
            },
            Self::ReLU(_)
            | Self::Flatten(_)
            | Self::Sigmoid(_)
            | Self::Softmax(_)
            | Self::Concatenate(_) => return None,
        };

        Some(shape)
    }

    /// Returns the amount of values this layer consumes from the parameter buffer.
    pub fn size(&self) -> usize {
        match self {
            Self::Dense(l) => l.size(),
            Self::Conv2d(l) => l.size(),
            _ => 0,
        }
    }

    /// Copies this layer's parameters out of `buf`, weights first and bias second.
    ///
    /// # Arguments
    /// * `buf` - The whole parameter buffer.
    /// * `offset` - Where this layer's parameters start.
    ///
    /// # Returns
    /// The amount of values consumed (0 for layers without parameters), or
    /// `InsufficientBuffer` if `offset + self.size()` exceeds `buf`. The layer is untouched on
    /// error.
    pub fn load(&mut self, buf: &[f32], offset: usize) -> Result<usize> {
        match self {
            Self::Dense(l) => l.load(buf, offset),
            Self::Conv2d(l) => l.load(buf, offset),
            _ if offset > buf.len() => Err(InferenceErr::InsufficientBuffer {
                required: offset,
                available: buf.len(),
            }),
            _ => Ok(0),
        }
    }

    /// Makes a forward pass through this layer.
    ///
    /// # Arguments
    /// * `x` - The input tensor.
    ///
    /// # Returns
    /// The output tensor, `ShapeMismatch` if `x` doesn't fit this layer or
    /// `MisconfiguredLayer` if this layer takes several inputs.
    pub fn forward(&self, x: ArrayViewD<f32>) -> Result<Tensor> {
        match self {
            Self::Dense(l) => l.forward(x),
            Self::Conv2d(l) => l.forward(x),
            Self::ReLU(l) => Ok(l.forward(x)),
            Self::Flatten(l) => Ok(l.forward(x)),
            Self::Sigmoid(l) => Ok(l.forward(x)),
            Self::Softmax(l) => l.forward(x),
            Self::Maxpool(l) => l.forward(x),
            Self::UpSample(l) => l.forward(x),
            Self::Concatenate(_) => Err(InferenceErr::MisconfiguredLayer {
                layer: Concatenate::NAME,
                reason: "takes a sequence of inputs, got a single tensor",
            }),
        }
    }

    /// Makes a forward pass through a layer taking several inputs.
    ///
    /// # Arguments
    /// * `xs` - The ordered inputs.
    ///
    /// # Returns
    /// The output tensor, or `MisconfiguredLayer` if this layer takes a single input.
    pub fn forward_many(&self, xs: &[ArrayViewD<f32>]) -> Result<Tensor> {
        match self {
            Self::Concatenate(l) => l.forward(xs),
            other => Err(InferenceErr::MisconfiguredLayer {
                layer: other.name(),
                reason: "takes a single input, got a sequence of tensors",
            }),
        }
    }
}
