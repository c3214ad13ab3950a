use depth_inpaint::camera::CameraIntrinsics;
use depth_inpaint::image::{DepthImage, ImageViewMut, Rgb, RgbImage};
use depth_inpaint::{Plane, Region};

pub const FLOOR_COLOR: Rgb = Rgb::new(90, 120, 60);
pub const OBJECT_COLOR: Rgb = Rgb::new(220, 30, 30);

/// Square pinhole camera centred on a `size × size` frame.
pub fn centred_intrinsics(size: usize) -> CameraIntrinsics {
    let c = size as f32 / 2.0;
    CameraIntrinsics::new(size as f32, size as f32, c, c)
}

/// Depth of `plane` sampled at every pixel, rounded to millimetres.
pub fn plane_depth(w: usize, h: usize, intrinsics: &CameraIntrinsics, plane: &Plane) -> DepthImage {
    let mut depth = DepthImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let z = plane
                .depth_at_pixel(intrinsics, x as f64, y as f64)
                .expect("synthetic plane must be in front of the camera");
            depth.set(x, y, z.round() as i16);
        }
    }
    depth
}

/// Constant-depth floor facing the camera.
pub fn flat_floor(w: usize, h: usize, depth_mm: i16) -> DepthImage {
    DepthImage::filled(w, h, depth_mm)
}

/// Two planes receding left and right from the centre column.
pub fn two_wall_corner(w: usize, h: usize, intrinsics: &CameraIntrinsics) -> DepthImage {
    let left = Plane::new(2000.0, -0.8, 0.0);
    let right = Plane::new(2000.0, 0.8, 0.0);
    let mut depth = DepthImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let plane = if (x as f32) < intrinsics.cx { &left } else { &right };
            let z = plane
                .depth_at_pixel(intrinsics, x as f64, y as f64)
                .expect("corner walls must be in front of the camera");
            depth.set(x, y, z.round() as i16);
        }
    }
    depth
}

/// Places a box of constant depth over `region`.
pub fn place_object(depth: &mut DepthImage, region: &Region, depth_mm: i16) {
    depth.fill_region(region, depth_mm);
}

/// Floor-colored image with the object painted over `region`.
pub fn floor_color(w: usize, h: usize, region: Option<&Region>) -> RgbImage {
    let mut color = RgbImage::filled(w, h, FLOOR_COLOR);
    if let Some(r) = region {
        color.fill_region(r, OBJECT_COLOR);
    }
    color
}

pub fn full_confidence(w: usize, h: usize) -> Vec<u8> {
    vec![255u8; w * h]
}
