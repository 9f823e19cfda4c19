use std::{collections::HashMap, num::NonZeroUsize};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::layers::{
    Concatenate, Conv2d, Dense, Flatten, Layer, Maxpool, ReLU, Sigmoid, Softmax, UpSample,
};
use crate::{InferenceErr, Result, config::LayerSpec};

/// Builds a layer out of the arguments of its `LayerSpec`.
pub type Constructor = fn(&Map<String, Value>) -> Result<Layer>;

/// Maps layer type keys to their constructors.
///
/// `Registry::default()` knows every built-in layer; new layer kinds are added with
/// `register` without touching the models that use them.
pub struct Registry {
    constructors: HashMap<&'static str, Constructor>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Dense::NAME, dense);
        registry.register(Conv2d::NAME, conv);
        registry.register(ReLU::NAME, |args| stateless(ReLU::NAME, args, Layer::relu));
        registry.register(Flatten::NAME, |args| {
            stateless(Flatten::NAME, args, Layer::flatten)
        });
        registry.register(Sigmoid::NAME, |args| {
            stateless(Sigmoid::NAME, args, Layer::sigmoid)
        });
        registry.register(Softmax::NAME, softmax);
        registry.register(Maxpool::NAME, maxpool);
        registry.register(UpSample::NAME, upsample);
        registry.register(Concatenate::NAME, |args| {
            stateless(Concatenate::NAME, args, Layer::concat)
        });
        registry
    }
}

impl Registry {
    /// Creates a registry without any constructors.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers `constructor` under `key`.
    ///
    /// # Returns
    /// The constructor previously registered under `key`, if any.
    pub fn register(&mut self, key: &'static str, constructor: Constructor) -> Option<Constructor> {
        self.constructors.insert(key, constructor)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    /// Returns the registered keys, sorted.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.constructors.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Builds the layer described by `spec`.
    ///
    /// # Returns
    /// The zero-initialized layer, `UnknownLayerType` if `spec.kind` isn't registered or
    /// `InvalidConfig` if its arguments don't fit the layer.
    pub fn build(&self, spec: &LayerSpec) -> Result<Layer> {
        let constructor = self
            .constructors
            .get(spec.kind.as_str())
            .ok_or_else(|| InferenceErr::UnknownLayerType(spec.kind.clone()))?;

        constructor(&spec.args)
    }
}

fn parse<T: DeserializeOwned>(key: &str, args: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| InferenceErr::InvalidConfig(format!("{key}: {e}")))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

fn stateless(key: &str, args: &Map<String, Value>, build: fn() -> Layer) -> Result<Layer> {
    parse::<NoArgs>(key, args)?;
    Ok(build())
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DenseArgs {
    in_features: usize,
    out_features: usize,
}

fn dense(args: &Map<String, Value>) -> Result<Layer> {
    let DenseArgs {
        in_features,
        out_features,
    } = parse(Dense::NAME, args)?;

    Ok(Layer::dense(in_features, out_features))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConvArgs {
    in_channels: usize,
    out_channels: usize,
    kernel_size: NonZeroUsize,
    #[serde(default = "one")]
    stride: NonZeroUsize,
}

fn conv(args: &Map<String, Value>) -> Result<Layer> {
    let ConvArgs {
        in_channels,
        out_channels,
        kernel_size,
        stride,
    } = parse(Conv2d::NAME, args)?;

    Ok(Layer::conv(in_channels, out_channels, kernel_size, stride))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SoftmaxArgs {
    #[serde(default = "last_axis")]
    axis: isize,
}

fn softmax(args: &Map<String, Value>) -> Result<Layer> {
    let SoftmaxArgs { axis } = parse(Softmax::NAME, args)?;
    Ok(Layer::softmax(axis))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MaxpoolArgs {
    #[serde(default = "two")]
    stride: NonZeroUsize,
}

fn maxpool(args: &Map<String, Value>) -> Result<Layer> {
    let MaxpoolArgs { stride } = parse(Maxpool::NAME, args)?;
    Ok(Layer::maxpool(stride))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UpSampleArgs {
    factor: NonZeroUsize,
}

fn upsample(args: &Map<String, Value>) -> Result<Layer> {
    let UpSampleArgs { factor } = parse(UpSample::NAME, args)?;
    Ok(Layer::upsample(factor))
}

fn one() -> NonZeroUsize {
    NonZeroUsize::MIN
}

fn two() -> NonZeroUsize {
    NonZeroUsize::MIN.saturating_add(1)
}

fn last_axis() -> isize {
    -1
}
