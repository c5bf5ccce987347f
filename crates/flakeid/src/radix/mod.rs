mod alphabet;
mod default;
mod encoding;

pub use alphabet::*;
pub use default::*;
pub use encoding::*;
