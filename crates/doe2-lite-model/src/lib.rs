// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOE2-Lite Model - Shared types and traits for DOE-2 model extensions
//!
//! This crate provides the building blocks shared by the INP parser and the
//! DOE-2 model properties:
//!
//! - [`Doe2Error`] - Error type used across the workspace
//! - [`CheckOptions`], [`CheckOutcome`], [`ReportBuilder`] - The common
//!   reporting contract of every validation check
//! - [`ValidationIssue`] - Structured validation finding
//! - [`Units`], [`parse_distance_string`] - Length units of a host model
//! - [`Face3D`] - Minimal planar face geometry
//! - [`CommandDict`], [`InpObject`], [`InpValue`] - Parsed INP data
//! - [`CommandParser`] - Entry point for parsing INP content
//!
//! # Example
//!
//! ```ignore
//! use doe2_lite_model::{CheckOptions, ReportBuilder, CheckOutcome};
//!
//! let mut report = ReportBuilder::new(CheckOptions::report_only());
//! report.push(CheckOutcome::Message("Room \"Attic\" is not closed".into()));
//! let outcome = report.finish()?;
//! println!("{}", outcome);
//! ```

pub mod error;
pub mod geometry;
pub mod report;
pub mod traits;
pub mod types;
pub mod units;

// Re-export all public types
// Re-export nalgebra types used in the geometry API
pub use nalgebra::{Point3, Vector3};

pub use error::*;
pub use geometry::*;
pub use report::*;
pub use traits::*;
pub use types::*;
pub use units::*;
