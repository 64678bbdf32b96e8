#![doc = include_str!("../README.md")]

mod codec;
mod error;
mod factory;
mod id;
mod kind;
mod rand;
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::codec::*;
pub use crate::error::*;
pub use crate::factory::*;
pub use crate::id::*;
pub use crate::kind::*;
pub use crate::rand::*;
pub use crate::time::*;
