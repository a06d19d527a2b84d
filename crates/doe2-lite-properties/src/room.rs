// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOE-2 attributes of a single room

use doe2_lite_model::{Doe2Error, Face3D, InpValue, Plane, Point3D, Result, Vector3};
use log::debug;
use serde_json::{json, Map, Value};

/// Type marker of room property dictionaries
pub const ROOM_PROPERTIES_TYPE: &str = "RoomDoe2Properties";

/// Zone air-flow attributes written to the INP SPACE/ZONE
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Airflow {
    /// Design supply air flow rate for the zone (cfm)
    AssignedFlow,
    /// Design supply air flow rate per floor area (cfm/ft2)
    FlowPerArea,
    /// Minimum supply flow as a fraction of design flow (0-1)
    MinFlowRatio,
    /// Minimum air flow per floor area (cfm/ft2)
    MinFlowPerArea,
    /// Ratio of maximum heating airflow to cooling airflow (0-1)
    HmaxFlowRatio,
}

impl Airflow {
    pub const ALL: [Airflow; 5] = [
        Airflow::AssignedFlow,
        Airflow::FlowPerArea,
        Airflow::MinFlowRatio,
        Airflow::MinFlowPerArea,
        Airflow::HmaxFlowRatio,
    ];

    /// INP keyword (also the user-data key)
    pub fn inp_keyword(&self) -> &'static str {
        match self {
            Airflow::AssignedFlow => "ASSIGNED-FLOW",
            Airflow::FlowPerArea => "FLOW/AREA",
            Airflow::MinFlowRatio => "MIN-FLOW-RATIO",
            Airflow::MinFlowPerArea => "MIN-FLOW/AREA",
            Airflow::HmaxFlowRatio => "HMAX-FLOW-RATIO",
        }
    }

    /// Key in property dictionaries
    pub fn dict_key(&self) -> &'static str {
        match self {
            Airflow::AssignedFlow => "assigned_flow",
            Airflow::FlowPerArea => "flow_per_area",
            Airflow::MinFlowRatio => "min_flow_ratio",
            Airflow::MinFlowPerArea => "min_flow_per_area",
            Airflow::HmaxFlowRatio => "hmax_flow_ratio",
        }
    }

    fn is_ratio(&self) -> bool {
        matches!(self, Airflow::MinFlowRatio | Airflow::HmaxFlowRatio)
    }

    /// Check a value against the attribute's range
    pub fn validate(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(Doe2Error::invalid_value(
                self.dict_key(),
                format!("expected a finite number, got {}", value),
            ));
        }
        if self.is_ratio() {
            if !(0.0..=1.0).contains(&value) {
                return Err(Doe2Error::invalid_value(
                    self.dict_key(),
                    format!("must be between 0 and 1, got {}", value),
                ));
            }
        } else if value < 0.0 {
            return Err(Doe2Error::invalid_value(
                self.dict_key(),
                format!("must be positive, got {}", value),
            ));
        }
        Ok(value)
    }
}

/// DOE-2 properties of a room
///
/// Unset attributes are not written to the INP; DOE-2 autocalculates them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomDoe2Properties {
    assigned_flow: Option<f64>,
    flow_per_area: Option<f64>,
    min_flow_ratio: Option<f64>,
    min_flow_per_area: Option<f64>,
    hmax_flow_ratio: Option<f64>,
    space_polygon_geometry: Option<Face3D>,
}

impl RoomDoe2Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an air-flow attribute
    pub fn get(&self, field: Airflow) -> Option<f64> {
        match field {
            Airflow::AssignedFlow => self.assigned_flow,
            Airflow::FlowPerArea => self.flow_per_area,
            Airflow::MinFlowRatio => self.min_flow_ratio,
            Airflow::MinFlowPerArea => self.min_flow_per_area,
            Airflow::HmaxFlowRatio => self.hmax_flow_ratio,
        }
    }

    /// Set or clear an air-flow attribute, rejecting out-of-range values
    pub fn set(&mut self, field: Airflow, value: Option<f64>) -> Result<()> {
        let value = value.map(|v| field.validate(v)).transpose()?;
        let slot = match field {
            Airflow::AssignedFlow => &mut self.assigned_flow,
            Airflow::FlowPerArea => &mut self.flow_per_area,
            Airflow::MinFlowRatio => &mut self.min_flow_ratio,
            Airflow::MinFlowPerArea => &mut self.min_flow_per_area,
            Airflow::HmaxFlowRatio => &mut self.hmax_flow_ratio,
        };
        *slot = value;
        Ok(())
    }

    pub fn assigned_flow(&self) -> Option<f64> {
        self.assigned_flow
    }

    pub fn set_assigned_flow(&mut self, value: Option<f64>) -> Result<()> {
        self.set(Airflow::AssignedFlow, value)
    }

    pub fn flow_per_area(&self) -> Option<f64> {
        self.flow_per_area
    }

    pub fn set_flow_per_area(&mut self, value: Option<f64>) -> Result<()> {
        self.set(Airflow::FlowPerArea, value)
    }

    pub fn min_flow_ratio(&self) -> Option<f64> {
        self.min_flow_ratio
    }

    pub fn set_min_flow_ratio(&mut self, value: Option<f64>) -> Result<()> {
        self.set(Airflow::MinFlowRatio, value)
    }

    pub fn min_flow_per_area(&self) -> Option<f64> {
        self.min_flow_per_area
    }

    pub fn set_min_flow_per_area(&mut self, value: Option<f64>) -> Result<()> {
        self.set(Airflow::MinFlowPerArea, value)
    }

    pub fn hmax_flow_ratio(&self) -> Option<f64> {
        self.hmax_flow_ratio
    }

    pub fn set_hmax_flow_ratio(&mut self, value: Option<f64>) -> Result<()> {
        self.set(Airflow::HmaxFlowRatio, value)
    }

    /// Horizontal face used as the SPACE polygon on export
    pub fn space_polygon_geometry(&self) -> Option<&Face3D> {
        self.space_polygon_geometry.as_ref()
    }

    /// Set the SPACE polygon, flipping downward-facing geometry
    pub fn set_space_polygon_geometry(&mut self, geometry: Option<Face3D>) {
        self.space_polygon_geometry = geometry.map(|face| {
            if face.normal()[2] < 0.0 {
                face.flip()
            } else {
                face
            }
        });
    }

    /// Apply a transform to the space polygon, if one is set
    fn map_polygon(&mut self, f: impl FnOnce(&Face3D) -> Face3D) {
        self.space_polygon_geometry = self.space_polygon_geometry.as_ref().map(f);
    }

    /// Move the space polygon along a vector
    pub fn move_by(&mut self, moving_vec: &Vector3<f64>) {
        self.map_polygon(|face| face.move_by(moving_vec));
    }

    /// Rotate the space polygon around an axis through an origin (degrees)
    pub fn rotate(&mut self, angle: f64, axis: &Vector3<f64>, origin: &Point3D) {
        self.map_polygon(|face| face.rotate(angle.to_radians(), axis, origin));
    }

    /// Rotate the space polygon counterclockwise in the XY plane (degrees)
    pub fn rotate_xy(&mut self, angle: f64, origin: &Point3D) {
        self.map_polygon(|face| face.rotate_xy(angle.to_radians(), origin));
    }

    /// Mirror the space polygon across a plane
    pub fn reflect(&mut self, plane: &Plane) {
        self.map_polygon(|face| face.reflect(plane));
    }

    /// Scale the space polygon from an origin (world origin if `None`)
    pub fn scale(&mut self, factor: f64, origin: Option<&Point3D>) {
        self.map_polygon(|face| face.scale(factor, origin));
    }

    /// Create properties from a `RoomDoe2Properties` dictionary
    pub fn from_dict(data: &Value) -> Result<Self> {
        let found = data.get("type").and_then(Value::as_str).unwrap_or("nothing");
        if found != ROOM_PROPERTIES_TYPE {
            return Err(Doe2Error::schema(format!(
                "Expected {}. Got {}.",
                ROOM_PROPERTIES_TYPE, found
            )));
        }
        let mut props = Self::new();
        props.apply_properties_from_dict(data)?;
        Ok(props)
    }

    /// Apply the attributes present in a `RoomDoe2Properties` dictionary
    ///
    /// Absent keys and `Autocalculate` values leave attributes untouched.
    pub fn apply_properties_from_dict(&mut self, data: &Value) -> Result<()> {
        for field in Airflow::ALL {
            match data.get(field.dict_key()) {
                None => {}
                Some(v) if is_autocalculate(v) => {}
                Some(Value::Null) => self.set(field, None)?,
                Some(v) => {
                    let n = v.as_f64().ok_or_else(|| {
                        Doe2Error::invalid_value(field.dict_key(), format!("expected a number, got {}", v))
                    })?;
                    self.set(field, Some(n))?;
                }
            }
        }

        if let Some(geo) = data.get("space_polygon_geometry").filter(|v| !v.is_null()) {
            let face: Face3D = serde_json::from_value(geo.clone()).map_err(|e| {
                Doe2Error::schema(format!("Invalid space_polygon_geometry: {}", e))
            })?;
            self.set_space_polygon_geometry(Some(face));
        }
        Ok(())
    }

    /// Fill still-unset air-flow attributes from room user data
    ///
    /// Keys use the INP keywords (`ASSIGNED-FLOW`, `FLOW/AREA`, ...). Values
    /// that are not valid numbers for the attribute are ignored.
    pub fn apply_properties_from_user_data(&mut self, user_data: Option<&Map<String, Value>>) {
        let Some(data) = user_data else {
            return;
        };
        for field in Airflow::ALL {
            if self.get(field).is_some() {
                continue;
            }
            let Some(raw) = data.get(field.inp_keyword()) else {
                continue;
            };
            let parsed = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match parsed.map(|n| self.set(field, Some(n))) {
                Some(Ok(())) => {}
                _ => debug!("Ignoring user_data {} = {}", field.inp_keyword(), raw),
            }
        }
    }

    /// Dictionary form, `{"doe2": {"type": "RoomDoe2Properties", ...}}`
    pub fn to_dict(&self) -> Value {
        let mut doe2 = Map::new();
        doe2.insert("type".to_string(), json!(ROOM_PROPERTIES_TYPE));
        for field in Airflow::ALL {
            if let Some(v) = self.get(field) {
                doe2.insert(field.dict_key().to_string(), json!(v));
            }
        }
        if let Some(face) = &self.space_polygon_geometry {
            doe2.insert(
                "space_polygon_geometry".to_string(),
                serde_json::to_value(face).unwrap_or(Value::Null),
            );
        }
        json!({ "doe2": doe2 })
    }

    /// INP keywords and values for the set air-flow attributes
    pub fn to_inp(&self) -> (Vec<&'static str>, Vec<InpValue>) {
        Airflow::ALL
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .map(|v| (field.inp_keyword(), InpValue::Number(v)))
            })
            .unzip()
    }
}

/// Check for the `{"type": "Autocalculate"}` placeholder
fn is_autocalculate(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("Autocalculate")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(z: f64, flip: bool) -> Face3D {
        let pts = vec![
            Point3D::new(0.0, 0.0, z),
            Point3D::new(10.0, 0.0, z),
            Point3D::new(10.0, 10.0, z),
            Point3D::new(0.0, 10.0, z),
        ];
        let face = Face3D::new(pts);
        if flip {
            face.flip()
        } else {
            face
        }
    }

    #[test]
    fn test_setters_validate_ranges() {
        let mut props = RoomDoe2Properties::new();
        props.set_assigned_flow(Some(500.0)).unwrap();
        props.set_min_flow_ratio(Some(0.3)).unwrap();
        assert_eq!(props.assigned_flow(), Some(500.0));

        let err = props.set_min_flow_ratio(Some(1.5)).unwrap_err();
        assert!(matches!(err, Doe2Error::InvalidValue { ref field, .. } if field == "min_flow_ratio"));
        assert_eq!(props.min_flow_ratio(), Some(0.3));

        assert!(props.set_flow_per_area(Some(-1.0)).is_err());
        assert!(props.set_hmax_flow_ratio(Some(f64::NAN)).is_err());
        props.set_assigned_flow(None).unwrap();
        assert_eq!(props.assigned_flow(), None);
    }

    #[test]
    fn test_polygon_stored_upward() {
        let mut props = RoomDoe2Properties::new();
        props.set_space_polygon_geometry(Some(floor(0.0, true)));
        let normal = props.space_polygon_geometry().unwrap().normal();
        assert!(normal[2] > 0.0);
    }

    fn assert_corner(props: &RoomDoe2Properties, index: usize, expected: [f64; 3]) {
        let corner = props.space_polygon_geometry().unwrap().boundary[index];
        let expected = Point3D::from(expected);
        assert!((corner - expected).norm() < 1e-9, "{} != {}", corner, expected);
    }

    #[test]
    fn test_transforms() {
        let mut props = RoomDoe2Properties::new();
        props.set_space_polygon_geometry(Some(floor(0.0, false)));
        props.move_by(&Vector3::new(0.0, 0.0, 3.0));
        props.scale(2.0, None);
        props.rotate_xy(90.0, &Point3D::origin());
        assert_corner(&props, 1, [0.0, 20.0, 6.0]);

        // half a turn around the vertical axis through the polygon corner
        props.rotate(180.0, &Vector3::z(), &Point3D::new(0.0, 20.0, 6.0));
        assert_corner(&props, 0, [0.0, 40.0, 6.0]);
        assert_corner(&props, 1, [0.0, 20.0, 6.0]);

        props.scale(0.5, Some(&Point3D::new(0.0, 20.0, 6.0)));
        assert_corner(&props, 0, [0.0, 30.0, 6.0]);
    }

    #[test]
    fn test_reflect_keeps_polygon_upward() {
        let mut props = RoomDoe2Properties::new();
        props.set_space_polygon_geometry(Some(floor(0.0, false)));
        props.reflect(&Plane::new(Vector3::x(), Point3D::origin()));

        assert_corner(&props, 2, [-10.0, 0.0, 0.0]);
        let face = props.space_polygon_geometry().unwrap();
        assert!(face.boundary.iter().all(|p| p.x <= 1e-9));
        assert!(face.normal().z > 0.0);
    }

    #[test]
    fn test_transforms_without_polygon() {
        let mut props = RoomDoe2Properties::new();
        props.move_by(&Vector3::new(1.0, 1.0, 1.0));
        props.rotate(45.0, &Vector3::x(), &Point3D::origin());
        props.reflect(&Plane::xy(Point3D::origin()));
        assert!(props.space_polygon_geometry().is_none());
    }

    #[test]
    fn test_dict_round_trip() {
        let mut props = RoomDoe2Properties::new();
        props.set_flow_per_area(Some(1.2)).unwrap();
        props.set_hmax_flow_ratio(Some(0.5)).unwrap();
        props.set_space_polygon_geometry(Some(floor(3.0, false)));

        let data = props.to_dict();
        assert_eq!(data["doe2"]["type"], "RoomDoe2Properties");
        assert_eq!(data["doe2"]["flow_per_area"], 1.2);
        assert!(data["doe2"].get("assigned_flow").is_none());

        let back = RoomDoe2Properties::from_dict(&data["doe2"]).unwrap();
        assert_eq!(back, props);
    }

    #[test]
    fn test_from_dict_wrong_type() {
        let err = RoomDoe2Properties::from_dict(&json!({"type": "RoomEnergyProperties"}))
            .unwrap_err();
        assert!(err.is_schema());
        assert_eq!(
            err.to_string(),
            "Invalid schema: Expected RoomDoe2Properties. Got RoomEnergyProperties."
        );
    }

    #[test]
    fn test_autocalculate_skipped() {
        let mut props = RoomDoe2Properties::new();
        props.set_assigned_flow(Some(100.0)).unwrap();
        props
            .apply_properties_from_dict(&json!({
                "type": "RoomDoe2Properties",
                "assigned_flow": {"type": "Autocalculate"},
                "min_flow_per_area": 0.4
            }))
            .unwrap();
        assert_eq!(props.assigned_flow(), Some(100.0));
        assert_eq!(props.min_flow_per_area(), Some(0.4));
    }

    #[test]
    fn test_invalid_dict_value() {
        let mut props = RoomDoe2Properties::new();
        let err = props
            .apply_properties_from_dict(&json!({"min_flow_ratio": 2.0}))
            .unwrap_err();
        assert!(matches!(err, Doe2Error::InvalidValue { .. }));
        assert!(props
            .apply_properties_from_dict(&json!({"assigned_flow": "lots"}))
            .is_err());
    }

    #[test]
    fn test_user_data_fills_unset_only() {
        let mut props = RoomDoe2Properties::new();
        props.set_assigned_flow(Some(10.0)).unwrap();

        let user_data = json!({
            "ASSIGNED-FLOW": 999,
            "FLOW/AREA": "1.5",
            "MIN-FLOW-RATIO": 4.0,
            "HMAX-FLOW-RATIO": "high"
        });
        props.apply_properties_from_user_data(user_data.as_object());

        assert_eq!(props.assigned_flow(), Some(10.0));
        assert_eq!(props.flow_per_area(), Some(1.5));
        assert_eq!(props.min_flow_ratio(), None);
        assert_eq!(props.hmax_flow_ratio(), None);
    }

    #[test]
    fn test_to_inp() {
        let mut props = RoomDoe2Properties::new();
        assert_eq!(props.to_inp(), (vec![], vec![]));

        props.set_min_flow_ratio(Some(0.3)).unwrap();
        props.set_assigned_flow(Some(250.0)).unwrap();
        let (keywords, values) = props.to_inp();
        assert_eq!(keywords, vec!["ASSIGNED-FLOW", "MIN-FLOW-RATIO"]);
        assert_eq!(values, vec![InpValue::Number(250.0), InpValue::Number(0.3)]);
    }
}
