pub mod scout;

pub use scout::{ResponseSchema, ScoutConfig};
