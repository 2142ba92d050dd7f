mod download;
pub use download::*;

mod search;
pub use search::*;
