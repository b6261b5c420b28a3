pub mod metric;
pub mod sample;
pub mod time_range;
pub mod tower;

pub use metric::*;
pub use sample::*;
pub use time_range::*;
pub use tower::*;
