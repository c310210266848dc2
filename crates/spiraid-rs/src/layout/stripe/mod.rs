//! Stripe layout implementations for supported RAID modes.

pub mod raid0;
pub mod raid1;
pub mod raid3;
pub mod traits;
