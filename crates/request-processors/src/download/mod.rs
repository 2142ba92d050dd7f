mod traits;
pub use traits::*;

mod types;
pub use types::*;

mod pipeline;
pub use pipeline::*;

#[cfg(test)]
mod mocks;
