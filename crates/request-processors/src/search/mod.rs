mod traits;
pub use traits::*;

mod types;
pub use types::*;

mod fan_out;
pub use fan_out::*;

mod aggregator;
pub use aggregator::*;

#[cfg(test)]
mod mocks;
