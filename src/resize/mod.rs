//! Derivation of bounded-size cover variants.
//!
//! The uploaded original is decoded once and every derived tier is produced
//! from that single decoded image, so `low` never inherits resampling
//! artifacts from `mid`.

mod resizer;

pub use resizer::{fit_within, Resizer, Variant};
