pub mod multiplier;
pub mod percentual;

pub use multiplier::{expand_multiplicador, expand_category};
pub use percentual::{expand_percentual, progressive_percentages};
