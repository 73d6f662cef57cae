/// Separable convolution layer pair
pub mod conv;

/// The classifier network and its configuration
pub mod model;

pub use conv::{SeparableConv1d, SeparableConv1dConfig};
pub use model::{Config, SepCnn};
