// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability traits for the host building model
//!
//! The DOE-2 extension never walks host geometry itself. It asks the host
//! to run its own checks through these interfaces and only merges the
//! results.

use crate::room::RoomDoe2Properties;
use doe2_lite_model::{CheckOptions, CheckOutcome, ReportBuilder, Result, Units, ValidationIssue};
use serde_json::{Map, Value};

/// Error code of rooms with holes in their floor plate or faces
pub const ROOM_HOLES_CODE: &str = "030102";

/// Geometry checks provided by the host model
///
/// Every check runs without raising and returns an empty outcome (in the
/// requested shape) when nothing was found.
pub trait GeometryChecks {
    /// Model distance tolerance
    fn tolerance(&self) -> f64;

    /// Model angle tolerance in degrees
    fn angle_tolerance(&self) -> f64;

    /// Length units of the model
    fn units(&self) -> Units;

    fn check_all_duplicate_identifiers(&self, detailed: bool) -> CheckOutcome;

    fn check_planar(&self, tolerance: f64, detailed: bool) -> CheckOutcome;

    fn check_self_intersecting(&self, tolerance: f64, detailed: bool) -> CheckOutcome;

    /// Check for rooms with no volume, using an area-like tolerance
    fn check_degenerate_rooms(&self, tolerance: f64, detailed: bool) -> CheckOutcome;

    fn check_sub_faces_valid(
        &self,
        tolerance: f64,
        angle_tolerance: f64,
        detailed: bool,
    ) -> CheckOutcome;

    fn check_sub_faces_overlapping(&self, tolerance: f64, detailed: bool) -> CheckOutcome;

    fn check_rooms_solid(&self, tolerance: f64, angle_tolerance: f64, detailed: bool)
        -> CheckOutcome;

    fn check_upside_down_faces(&self, angle_tolerance: f64, detailed: bool) -> CheckOutcome;

    fn check_room_volume_collisions(&self, tolerance: f64, detailed: bool) -> CheckOutcome;

    fn check_missing_adjacencies(&self, detailed: bool) -> CheckOutcome;

    fn check_matching_adjacent_areas(&self, tolerance: f64, detailed: bool) -> CheckOutcome;

    fn check_all_air_boundaries_adjacent(&self, detailed: bool) -> CheckOutcome;
}

/// Checks provided by the host's energy extension
pub trait EnergyChecks {
    /// Check that interior constructions of adjacent faces mirror each other
    fn check_interior_constructions_reversed(&self, detailed: bool) -> CheckOutcome;
}

/// Host model interface - read access for the DOE-2 checks
///
/// # Example
///
/// ```ignore
/// use doe2_lite_properties::{HostModel, ModelDoe2Properties};
/// use doe2_lite_model::CheckOptions;
///
/// let doe2 = ModelDoe2Properties::new(&model);
/// let report = doe2.check_for_extension(CheckOptions::report_only())?;
/// println!("{}", report);
/// ```
pub trait HostModel: GeometryChecks {
    /// Room type of the host
    type Room: HostRoom;

    /// Name shown in reports
    fn display_name(&self) -> &str;

    /// Rooms in model order
    fn rooms(&self) -> &[Self::Room];

    /// Energy extension of the model
    fn energy(&self) -> &dyn EnergyChecks;
}

/// Mutable host access, needed only to apply dictionary properties
pub trait HostModelMut: HostModel {
    fn rooms_mut(&mut self) -> &mut [Self::Room];
}

/// Host room interface
pub trait HostRoom {
    fn identifier(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Number of holes in each face geometry of the room
    fn face_hole_counts(&self) -> Vec<usize>;

    /// Free-form user data attached to the room
    fn user_data(&self) -> Option<&Map<String, Value>> {
        None
    }

    /// DOE-2 properties of the room
    fn doe2(&self) -> &RoomDoe2Properties;

    fn doe2_mut(&mut self) -> &mut RoomDoe2Properties;

    /// Check whether the room's floor plate or faces have holes
    ///
    /// eQuest cannot represent such rooms; exporting drops the holes.
    fn check_no_holes(&self, options: CheckOptions) -> Result<CheckOutcome> {
        let mut report = ReportBuilder::new(options);
        let mut msgs = Vec::new();

        if let Some(floor) = self.doe2().space_polygon_geometry() {
            if floor.has_holes() {
                let hole_msg = match floor.hole_count() {
                    1 => "a hole".to_string(),
                    n => format!("{} holes", n),
                };
                msgs.push(format!(
                    "Room \"{}\" has a floor plate with {}, which the eQuest interface \
                     cannot represent.",
                    self.display_name(),
                    hole_msg
                ));
            }
        }

        let hole_count: usize = self.face_hole_counts().iter().sum();
        if hole_count != 0 {
            let (f_msg, hole_msg) = match hole_count {
                1 => ("a face", "a hole".to_string()),
                n => ("faces", format!("{} total holes", n)),
            };
            msgs.push(format!(
                "Room \"{}\" has {} with {}, which the eQuest interface cannot represent.",
                self.display_name(),
                f_msg,
                hole_msg
            ));
        }

        if !msgs.is_empty() {
            let msg = msgs.join("\n");
            let outcome = if report.detailed() {
                CheckOutcome::Detailed(vec![ValidationIssue::new(
                    ROOM_HOLES_CODE,
                    "Room Contains Holes",
                    msg,
                )
                .with_extension("DOE2")
                .with_element("Room", self.identifier(), self.display_name())])
            } else {
                CheckOutcome::Message(msg)
            };
            report.push(outcome);
        }
        report.finish()
    }

    /// Fill unset airflow attributes from the room's user data
    fn apply_doe2_from_user_data(&mut self) {
        let data = self.user_data().cloned();
        self.doe2_mut().apply_properties_from_user_data(data.as_ref());
    }

    /// Text form of the room's DOE-2 properties
    fn doe2_label(&self) -> String {
        format!("Room DOE2 Properties: [host: {}]", self.display_name())
    }
}
