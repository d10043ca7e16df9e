pub mod swing_config;

pub use swing_config::{FillModel, SwingConfig};
