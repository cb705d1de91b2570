#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod arith;
mod context;
mod curve;
mod error;
mod point;
mod scalar;

pub use crate::{
    context::EcContext,
    curve::{NistCurve, P256, P384, P521},
    error::{Error, Result},
    point::EcPoint,
};
pub use montfield;
pub use subtle;
