mod duration;
mod spotify;
mod youtube;

pub use duration::*;
pub use spotify::*;
pub use youtube::*;
