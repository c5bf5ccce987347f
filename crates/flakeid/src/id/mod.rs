mod precision;
mod sequential;

pub use precision::*;
pub use sequential::*;
