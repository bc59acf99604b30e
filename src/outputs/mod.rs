//! Output persistence for harvested records.

pub mod json;
