//! Shared data models

mod homestay;

pub use homestay::Homestay;
