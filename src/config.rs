use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// A single layer entry of a model configuration.
///
/// `type` is a registry key and the remaining fields are the layer's arguments, e.g.
/// `{"type": "conv", "in_channels": 3, "out_channels": 16, "kernel_size": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub args: Map<String, Value>,
}

impl LayerSpec {
    pub fn new<K: Into<String>>(kind: K, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self {
            kind: kind.into(),
            args,
        }
    }
}

/// A sequential model's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// The shape of the model's input, if known.
    #[serde(default)]
    pub input_shape: Option<Vec<usize>>,
    pub layers: Vec<LayerSpec>,
}

impl ModelConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::InferenceErr;

    #[test]
    fn parses_type_and_flattened_args() {
        let config = ModelConfig::from_json(
            r#"{
                "input_shape": [1, 1, 28, 28],
                "layers": [
                    {"type": "conv", "in_channels": 1, "out_channels": 4, "kernel_size": 3},
                    {"type": "relu"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.input_shape, Some(vec![1, 1, 28, 28]));
        assert_eq!(
            config.layers,
            vec![
                LayerSpec::new(
                    "conv",
                    json!({"in_channels": 1, "out_channels": 4, "kernel_size": 3})
                ),
                LayerSpec::new("relu", json!({})),
            ]
        );
    }

    #[test]
    fn input_shape_is_optional() {
        let config = ModelConfig::from_json(r#"{"layers": []}"#).unwrap();

        assert!(config.input_shape.is_none());
        assert!(config.layers.is_empty());
    }

    #[test]
    fn missing_type_is_a_json_error() {
        let err = ModelConfig::from_json(r#"{"layers": [{"axis": 1}]}"#).unwrap_err();

        assert!(matches!(err, InferenceErr::Json(_)));
    }
}
