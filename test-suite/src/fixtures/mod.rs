//! PDF fixture generators

pub mod builder;
pub mod invalid;

pub use builder::{sample_jpeg, FixturePage, FixturePdfBuilder, ImageId};
