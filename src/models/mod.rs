mod grocery;
mod order;

pub use grocery::*;
pub use order::*;
