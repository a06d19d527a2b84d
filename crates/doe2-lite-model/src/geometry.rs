// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal planar face geometry
//!
//! Only what the DOE-2 extension needs to carry a space polygon around:
//! loops of points, hole detection, orientation and rigid transforms.
//! Geometric validation lives with the host model.

use nalgebra::{Matrix4, Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space
pub type Point3D = Point3<f64>;

/// A plane given by its unit normal and a point on it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Unit<Vector3<f64>>,
    pub origin: Point3D,
}

impl Plane {
    /// Create a plane, normalizing `normal`
    pub fn new(normal: Vector3<f64>, origin: Point3D) -> Self {
        Self {
            normal: Unit::new_normalize(normal),
            origin,
        }
    }

    /// The world XY plane through `origin`
    pub fn xy(origin: Point3D) -> Self {
        Self::new(Vector3::z(), origin)
    }
}

/// Conjugate a linear transform so it acts around `origin`
fn around(origin: &Point3D, transform: Matrix4<f64>) -> Matrix4<f64> {
    Matrix4::new_translation(&origin.coords) * transform * Matrix4::new_translation(&-origin.coords)
}

/// A planar face made of a boundary loop and optional hole loops
///
/// Serialized as `{"type": "Face3D", "boundary": [[x, y, z], ..], "holes": [..]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "FaceRecord", into = "FaceRecord")]
pub struct Face3D {
    /// Outer boundary vertices
    pub boundary: Vec<Point3D>,
    /// Hole loops inside the boundary
    pub holes: Vec<Vec<Point3D>>,
}

impl Face3D {
    /// Create a face without holes
    pub fn new(boundary: Vec<Point3D>) -> Self {
        Self {
            boundary,
            holes: Vec::new(),
        }
    }

    /// Create a face with hole loops
    pub fn with_holes(boundary: Vec<Point3D>, holes: Vec<Vec<Point3D>>) -> Self {
        Self { boundary, holes }
    }

    /// Check if the face has one or more holes
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Number of hole loops
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// Unit normal of the boundary loop (Newell's method)
    ///
    /// Returns a zero vector for degenerate loops.
    pub fn normal(&self) -> Vector3<f64> {
        let count = self.boundary.len();
        let area_vector: Vector3<f64> = (0..count)
            .map(|i| {
                let a = &self.boundary[i].coords;
                let b = &self.boundary[(i + 1) % count].coords;
                a.cross(b)
            })
            .sum();
        area_vector
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Reverse the vertex order, flipping the normal
    pub fn flip(&self) -> Self {
        let reverse = |pts: &Vec<Point3D>| pts.iter().rev().copied().collect::<Vec<_>>();
        Self {
            boundary: reverse(&self.boundary),
            holes: self.holes.iter().map(reverse).collect(),
        }
    }

    /// Apply a homogeneous transform to every vertex
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        let apply = |pts: &Vec<Point3D>| {
            pts.iter().map(|p| matrix.transform_point(p)).collect::<Vec<_>>()
        };
        Self {
            boundary: apply(&self.boundary),
            holes: self.holes.iter().map(apply).collect(),
        }
    }

    /// Move the face along a vector
    pub fn move_by(&self, moving_vec: &Vector3<f64>) -> Self {
        self.transform(&Matrix4::new_translation(moving_vec))
    }

    /// Scale the face from an origin (world origin if `None`)
    pub fn scale(&self, factor: f64, origin: Option<&Point3D>) -> Self {
        let scaling = Matrix4::new_scaling(factor);
        match origin {
            Some(origin) => self.transform(&around(origin, scaling)),
            None => self.transform(&scaling),
        }
    }

    /// Rotate around an axis through an origin (angle in radians)
    pub fn rotate(&self, angle: f64, axis: &Vector3<f64>, origin: &Point3D) -> Self {
        let rotation = Matrix4::new_rotation(axis.normalize() * angle);
        self.transform(&around(origin, rotation))
    }

    /// Rotate counterclockwise in the XY plane (angle in radians)
    pub fn rotate_xy(&self, angle: f64, origin: &Point3D) -> Self {
        self.rotate(angle, &Vector3::z(), origin)
    }

    /// Mirror the face across a plane
    ///
    /// Vertex order is reversed so the normal follows the mirrored geometry.
    pub fn reflect(&self, plane: &Plane) -> Self {
        let n = plane.normal.into_inner();
        let mut mirror = Matrix4::identity();
        mirror
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(nalgebra::Matrix3::identity() - 2.0 * n * n.transpose()));
        self.transform(&around(&plane.origin, mirror)).flip()
    }
}

/// Serialized layout of [`Face3D`]
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Face3D")]
struct FaceRecord {
    boundary: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    holes: Vec<Vec<[f64; 3]>>,
}

impl From<FaceRecord> for Face3D {
    fn from(record: FaceRecord) -> Self {
        let points = |pts: Vec<[f64; 3]>| pts.into_iter().map(Point3D::from).collect::<Vec<_>>();
        Self {
            boundary: points(record.boundary),
            holes: record.holes.into_iter().map(points).collect(),
        }
    }
}

impl From<Face3D> for FaceRecord {
    fn from(face: Face3D) -> Self {
        let coords = |pts: Vec<Point3D>| pts.into_iter().map(|p| [p.x, p.y, p.z]).collect::<Vec<_>>();
        Self {
            boundary: coords(face.boundary),
            holes: face.holes.into_iter().map(coords).collect(),
        }
    }
}
