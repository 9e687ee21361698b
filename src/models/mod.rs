pub mod filter;
pub mod record;
pub mod statistics;

pub use filter::*;
pub use record::*;
pub use statistics::*;
