mod interface;
mod os_fallback;
mod thread_random;

pub use interface::*;
pub use os_fallback::*;
pub use thread_random::*;
