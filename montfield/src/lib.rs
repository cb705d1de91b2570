#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod error;
mod limb;
mod mont;
mod scatter;
mod window;

pub use crate::{
    error::{Error, Result},
    mont::{FieldElement, MontCtx, Scratchpad},
    scatter::{CACHE_LINE_SIZE, ProtMemory, expand_seed, scatter},
    window::{BitWindowLr, BitWindowRl},
};
pub use subtle;
pub use zeroize;
