// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOE-2 properties of a whole model: validation batteries and dictionaries

use crate::traits::{GeometryChecks, HostModel, HostModelMut, HostRoom};
use doe2_lite_model::{parse_distance_string, CheckOptions, CheckOutcome, Doe2Error, ReportBuilder, Result};
use log::{debug, warn};
use serde_json::{json, Value};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Type marker of model property dictionaries
pub const MODEL_PROPERTIES_TYPE: &str = "ModelDoe2Properties";

/// Distance below which rooms count as degenerate for DOE-2
pub const DEGENERATE_ROOM_TOLERANCE: &str = "0.03ft";

/// What to do when a model dictionary lists a different number of rooms
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoomCountPolicy {
    /// Pair rooms positionally up to the shorter list and log a warning
    #[default]
    Truncate,
    /// Fail with a schema error
    Strict,
}

/// DOE-2 properties of a host model
///
/// `H` is any pointer to the host: `&Model` for checks, `&mut Model` (or a
/// `Box`) when dictionary properties are applied.
///
/// # Example
///
/// ```ignore
/// use doe2_lite_properties::ModelDoe2Properties;
/// use doe2_lite_model::CheckOptions;
///
/// let doe2 = ModelDoe2Properties::new(&model);
/// match doe2.check_for_extension(CheckOptions::new()) {
///     Ok(_) => println!("Model is valid for DOE-2"),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub struct ModelDoe2Properties<H> {
    host: H,
}

impl<H> ModelDoe2Properties<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Get the pointer to the host model
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Dictionary form, `{"doe2": {"type": "ModelDoe2Properties"}}`
    pub fn to_dict(&self) -> Value {
        json!({ "doe2": { "type": MODEL_PROPERTIES_TYPE } })
    }
}

impl<H> ModelDoe2Properties<H>
where
    H: Deref,
    H::Target: HostModel,
{
    /// Check that the model is valid for DOE-2 simulation
    ///
    /// Runs the relevant host geometry and adjacency checks, the energy
    /// extension's construction check and the DOE-2 room hole check.
    pub fn check_for_extension(&self, options: CheckOptions) -> Result<CheckOutcome> {
        let mut report = ReportBuilder::new(options);
        let detailed = report.detailed();
        let host = &*self.host;
        let tol = host.tolerance();
        let ang_tol = host.angle_tolerance();
        let e_tol = parse_distance_string(DEGENERATE_ROOM_TOLERANCE, host.units())?;

        // duplicate identifiers first, they can confuse the other checks
        report.push(host.check_all_duplicate_identifiers(detailed));

        // geometry rules
        report.push(host.check_planar(tol, detailed));
        report.push(host.check_self_intersecting(tol, detailed));
        report.push(host.check_degenerate_rooms(e_tol, detailed));

        // parent-child relationships
        report.push(host.check_sub_faces_valid(tol, ang_tol, detailed));
        report.push(host.check_sub_faces_overlapping(tol, detailed));
        report.push(host.check_rooms_solid(tol, ang_tol, detailed));
        report.push(host.check_upside_down_faces(ang_tol, detailed));

        // adjacency relationships
        report.push(host.check_room_volume_collisions(tol, detailed));
        report.push(host.check_missing_adjacencies(detailed));
        report.push(host.check_matching_adjacent_areas(tol, detailed));
        report.push(host.check_all_air_boundaries_adjacent(detailed));

        // DOE-2 specific
        report.push(host.energy().check_interior_constructions_reversed(detailed));
        report.push(self.check_no_room_holes(report.delegated())?);

        debug!(
            "DOE-2 extension checks on {}: {} findings",
            host.display_name(),
            report.len()
        );
        report.finish()
    }

    /// Check the generic aspects of the DOE-2 properties
    ///
    /// Covers everything except floor plate holes and courtyards. No such
    /// checks exist yet, so the report is always empty.
    pub fn check_generic(&self, options: CheckOptions) -> Result<CheckOutcome> {
        let report = ReportBuilder::new(options);
        debug!("DOE-2 generic checks on {}: {} findings", self.host.display_name(), report.len());
        report.finish()
    }

    /// Check all aspects of the DOE-2 properties (currently none)
    pub fn check_all(&self, options: CheckOptions) -> Result<CheckOutcome> {
        let report = ReportBuilder::new(options);
        debug!("DOE-2 checks on {}: {} findings", self.host.display_name(), report.len());
        report.finish()
    }

    /// Check whether any room has geometry with holes
    pub fn check_no_room_holes(&self, options: CheckOptions) -> Result<CheckOutcome> {
        let mut report = ReportBuilder::new(options);
        for room in self.host.rooms() {
            report.push(room.check_no_holes(report.delegated())?);
        }
        debug!(
            "DOE-2 room hole checks on {}: {} findings",
            self.host.display_name(),
            report.len()
        );
        report.finish()
    }
}

impl<H> ModelDoe2Properties<H>
where
    H: DerefMut,
    H::Target: HostModelMut,
{
    /// Apply the DOE-2 properties of a whole-model dictionary to the host rooms
    ///
    /// Rooms are paired with `data["rooms"]` by position.
    pub fn apply_properties_from_dict(&mut self, data: &Value) -> Result<()> {
        self.apply_properties_from_dict_with(data, RoomCountPolicy::default())
    }

    /// Same as [`Self::apply_properties_from_dict`] with an explicit room count policy
    pub fn apply_properties_from_dict_with(
        &mut self,
        data: &Value,
        policy: RoomCountPolicy,
    ) -> Result<()> {
        if !has_doe2_marker(data) {
            return Err(Doe2Error::schema("Dictionary possesses no ModelDoe2Properties."));
        }

        let room_dicts = match data.get("rooms") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(rooms)) => rooms,
            Some(other) => {
                return Err(Doe2Error::schema(format!(
                    "Expected a list of rooms. Got {}.",
                    other
                )))
            }
        };

        let rooms = self.host.rooms_mut();
        if rooms.len() != room_dicts.len() {
            match policy {
                RoomCountPolicy::Strict => {
                    return Err(Doe2Error::schema(format!(
                        "Dictionary has {} rooms but the model has {}.",
                        room_dicts.len(),
                        rooms.len()
                    )))
                }
                RoomCountPolicy::Truncate => warn!(
                    "Dictionary has {} rooms but the model has {}; applying to the first {}",
                    room_dicts.len(),
                    rooms.len(),
                    rooms.len().min(room_dicts.len())
                ),
            }
        }

        for (room, room_dict) in rooms.iter_mut().zip(room_dicts) {
            if let Some(record) = doe2_record(room_dict) {
                room.doe2_mut().apply_properties_from_dict(record)?;
            }
        }
        Ok(())
    }
}

/// Whether an object dictionary carries a `properties.doe2` key, even a null one
fn has_doe2_marker(data: &Value) -> bool {
    data.get("properties").and_then(|p| p.get("doe2")).is_some()
}

/// The non-null `properties.doe2` record of an object dictionary
fn doe2_record(data: &Value) -> Option<&Value> {
    data.get("properties")
        .and_then(|p| p.get("doe2"))
        .filter(|v| !v.is_null())
}

impl<H> fmt::Display for ModelDoe2Properties<H>
where
    H: Deref,
    H::Target: HostModel,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model DOE2 Properties: [host: {}]", self.host.display_name())
    }
}
