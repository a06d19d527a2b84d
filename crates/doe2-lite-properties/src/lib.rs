// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOE2-Lite Properties - DOE-2 extension for building energy models
//!
//! Adds DOE-2 specific validation, room attributes and dictionary
//! serialization to a host model that implements the [`HostModel`] traits.
//!
//! - [`ModelDoe2Properties`] - Validation batteries over the whole model
//! - [`RoomDoe2Properties`] - Air-flow attributes and the SPACE polygon of a room
//!
//! # Example
//!
//! ```ignore
//! use doe2_lite_properties::ModelDoe2Properties;
//! use doe2_lite_model::CheckOptions;
//!
//! let doe2 = ModelDoe2Properties::new(&model);
//! let report = doe2.check_for_extension(CheckOptions::detailed_report())?;
//! for issue in report.issues().unwrap_or_default() {
//!     println!("{}", issue);
//! }
//! ```

pub mod model;
pub mod room;
pub mod traits;

pub use model::{ModelDoe2Properties, RoomCountPolicy, MODEL_PROPERTIES_TYPE};
pub use room::{Airflow, RoomDoe2Properties, ROOM_PROPERTIES_TYPE};
pub use traits::{EnergyChecks, GeometryChecks, HostModel, HostModelMut, HostRoom, ROOM_HOLES_CODE};
