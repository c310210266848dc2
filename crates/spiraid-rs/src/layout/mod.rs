//! Data placement across the four channels.

pub mod bits;
pub mod mapping;
pub mod stripe;
