mod fan_in;
pub mod layers;
mod model;
mod registry;
mod sequential;

pub use fan_in::FanIn;
pub use model::Model;
pub use registry::{Constructor, Registry};
pub use sequential::Sequential;
