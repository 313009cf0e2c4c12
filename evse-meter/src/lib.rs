//! Generation-normalizing meter driver for the JSON device family
//!
//! One physical device family, several document shapes: generation-1
//! firmware serves flat `meters[]`/`emeters[]` arrays with model-specific
//! energy units, generation 2+ serves per-channel keyed objects in
//! canonical units. This crate identifies the device once at connect
//! time, then normalizes every status document into a
//! [`CanonicalReading`](evse_core::CanonicalReading).

pub mod device;
pub mod gen1;
pub mod gen2;
pub mod meter;
pub mod normalize;
pub mod quirk;

pub use device::DeviceInfo;
pub use meter::{Meter, MeterBuilder};
pub use normalize::Normalizer;
pub use quirk::{EnergyQuirk, QuirkTable};
