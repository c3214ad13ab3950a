//! Tap-to-pose resolution for placing a replacement object.
//!
//! A normalized screen tap selects a depth pixel. The pixel is
//! back-projected into a right-handed camera frame (x right, y up, camera
//! looking down −z), expressed in metres and moved to world space with the
//! camera pose. The local surface normal comes from the same outlier-filtered
//! neighbour slopes as the normal estimator, with y flipped and the forward
//! component fixed to +1. The orientation is the shortest rotation taking
//! world up `(0, 1, 0)` onto that normal.
use crate::camera::{CameraIntrinsics, CameraPose};
use crate::image::DepthImage;
use crate::normals::{depth_gradient, NormalParams};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Tunables of the tap resolver.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TapParams {
    /// Neighbourhood half-size; taps closer than this to a border are rejected.
    pub radius: usize,
    /// Maximum relative depth difference of a usable neighbour.
    pub outlier_ratio: f32,
}

impl Default for TapParams {
    fn default() -> Self {
        Self {
            radius: 2,
            outlier_ratio: 0.2,
        }
    }
}

/// World-space position (metres) and orientation for a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlacementPose {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl PlacementPose {
    /// Local up axis of the placed object in world space.
    pub fn up(&self) -> Vector3<f32> {
        self.orientation * Vector3::y()
    }

    pub fn to_isometry(&self) -> CameraPose {
        CameraPose::from_parts(self.position.into(), self.orientation)
    }
}

/// Resolves a tap `[u, v] ∈ [0, 1]²` into a world-space placement.
///
/// `None` when the tap is outside the frame or within `radius` of a border,
/// the pixel has no depth, or the surface slope is undefined along either axis.
pub fn resolve_tap(
    tap: [f32; 2],
    depth: &DepthImage,
    intrinsics: &CameraIntrinsics,
    pose: &CameraPose,
    params: &TapParams,
) -> Option<PlacementPose> {
    let (x, y) = tap_to_pixel(tap, depth.w, depth.h)?;
    let r = params.radius;
    if x < r || y < r || x + r >= depth.w || y + r >= depth.h {
        return None;
    }

    let grad = depth_gradient(
        depth,
        x,
        y,
        &NormalParams {
            radius: r,
            outlier_ratio: params.outlier_ratio,
        },
    )?;
    let d = grad.depth;
    let vertex = Point3::new(
        d * (x as f32 - intrinsics.cx) / intrinsics.fx,
        -d * (y as f32 - intrinsics.cy) / intrinsics.fy,
        -d,
    ) / 1000.0;
    let position = (pose * vertex).coords;

    let (pixel_x, pixel_y) = intrinsics.pixel_size(d);
    let slope_x = grad.slope_x()?;
    let slope_y = grad.slope_y()?;
    let local = Vector3::new(slope_x / pixel_x, -slope_y / pixel_y, 1.0);
    let local = local.try_normalize(f32::EPSILON)?;
    let normal = pose.rotation * local;

    Some(PlacementPose {
        position,
        orientation: rotation_from_up(&normal),
    })
}

/// Shortest rotation taking `(0, 1, 0)` onto `target` (assumed unit length).
pub fn rotation_from_up(target: &Vector3<f32>) -> UnitQuaternion<f32> {
    let up = Vector3::y();
    let cos = up.dot(target).clamp(-1.0, 1.0);
    match Unit::try_new(up.cross(target), 1e-6) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, cos.acos()),
        None if cos > 0.0 => UnitQuaternion::identity(),
        None => UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
    }
}

fn tap_to_pixel(tap: [f32; 2], w: usize, h: usize) -> Option<(usize, usize)> {
    let [u, v] = tap;
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) || w == 0 || h == 0 {
        return None;
    }
    let x = ((u * w as f32) as usize).min(w - 1);
    let y = ((v * h as f32) as usize).min(h - 1);
    Some((x, y))
}
