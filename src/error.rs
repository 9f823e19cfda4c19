use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire inference crate.
pub type Result<T> = std::result::Result<T, InferenceErr>;

/// The inference crate's error type.
#[derive(Debug)]
pub enum InferenceErr {
    /// A registry lookup miss while building a model.
    UnknownLayerType(String),
    /// An input tensor is incompatible with the layer or with a sibling input.
    ShapeMismatch {
        layer: &'static str,
        got: Vec<usize>,
        expected: String,
    },
    /// The parameter buffer is shorter than what the layers require.
    InsufficientBuffer { required: usize, available: usize },
    /// A forward call reached a layer that has no implementation for it.
    MisconfiguredLayer {
        layer: &'static str,
        reason: &'static str,
    },
    InvalidConfig(String),
    MalformedBuffer { len: usize },
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for InferenceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceErr::UnknownLayerType(key) => write!(f, "unknown layer type '{key}'"),
            InferenceErr::ShapeMismatch {
                layer,
                got,
                expected,
            } => write!(
                f,
                "shape mismatch in {layer} layer: got {got:?}, expected {expected}"
            ),
            InferenceErr::InsufficientBuffer {
                required,
                available,
            } => write!(
                f,
                "parameter buffer too short: {required} values required, {available} available"
            ),
            InferenceErr::MisconfiguredLayer { layer, reason } => {
                write!(f, "misconfigured {layer} layer: {reason}")
            }
            InferenceErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            InferenceErr::MalformedBuffer { len } => write!(
                f,
                "parameter buffer of {len} bytes is not a whole number of f32 values"
            ),
            InferenceErr::Io(e) => write!(f, "io error: {e}"),
            InferenceErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for InferenceErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InferenceErr::Io(e) => Some(e),
            InferenceErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for InferenceErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for InferenceErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl InferenceErr {
    pub(crate) fn shape(layer: &'static str, got: &[usize], expected: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            layer,
            got: got.to_vec(),
            expected: expected.into(),
        }
    }
}
