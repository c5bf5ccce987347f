#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod mutex;
mod radix;
mod random;
#[cfg(feature = "serde")]
mod serde_support;
mod time;

pub mod luhn;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub(crate) use crate::mutex::Mutex;
pub use crate::radix::*;
pub use crate::random::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde_support::*;
pub use crate::time::*;
