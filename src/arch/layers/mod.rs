mod concat;
mod conv2d;
mod dense;
mod flatten;
mod layer;
mod pooling;
mod relu;
mod sigmoid;
mod softmax;

pub use concat::Concatenate;
pub use conv2d::Conv2d;
pub use dense::Dense;
pub use flatten::Flatten;
pub use layer::{Layer, ParamShape};
pub use pooling::{Maxpool, UpSample};
pub use relu::ReLU;
pub use sigmoid::Sigmoid;
pub use softmax::Softmax;
