// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `core` module defines small types shared by every compiler stage.

mod internal_error;
mod source_location;

pub use source_location::SourceLocation;
