mod config;
mod default;
mod interface;
mod sequential;
mod short;
pub use config::*;
pub use default::*;
pub use interface::*;
pub use sequential::*;
pub use short::*;
