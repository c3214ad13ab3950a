mod common;

use common::synthetic_frame::{
    centred_intrinsics, flat_floor, floor_color, full_confidence, place_object, plane_depth,
    FLOOR_COLOR, OBJECT_COLOR,
};
use depth_inpaint::camera::CameraIntrinsics;
use depth_inpaint::image::{DepthImage, ImageU8, Rgb, RgbImage};
use depth_inpaint::inpaint::ColorMapping;
use depth_inpaint::{InpaintFrame, InpaintOutcome, InpaintParams, Inpainter, Plane, Region};

fn identity_params() -> InpaintParams {
    InpaintParams {
        color: ColorMapping::identity(),
        ..Default::default()
    }
}

fn run(
    inpainter: &mut Inpainter,
    depth: &mut DepthImage,
    confidence: &[u8],
    color: Option<&mut RgbImage>,
    intrinsics: CameraIntrinsics,
    region: Region,
) -> depth_inpaint::InpaintReport {
    let (w, h) = (depth.w, depth.h);
    inpainter
        .process(InpaintFrame {
            depth,
            confidence: ImageU8::packed(w, h, confidence),
            color,
            intrinsics,
            region,
        })
        .expect("synthetic frame satisfies the buffer contract")
}

#[test]
fn flat_floor_hole_takes_floor_depth_and_color() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (100usize, 100usize);
    let region = Region::new(40, 40, 60, 60);
    let mut depth = flat_floor(w, h, 2000);
    place_object(&mut depth, &region, 1200);
    let mut color = floor_color(w, h, Some(&region));
    let confidence = full_confidence(w, h);
    let intrinsics = centred_intrinsics(w);

    let mut inpainter = Inpainter::new(w, h, identity_params());
    let report = run(
        &mut inpainter,
        &mut depth,
        &confidence,
        Some(&mut color),
        intrinsics,
        region,
    );

    assert_eq!(report.outcome, InpaintOutcome::Inpainted);
    assert_eq!(report.masked_pixels, region.width() * region.height());
    assert_eq!(report.planes.len(), 1);
    assert_eq!(report.filled_pixels, 21 * 21);
    assert_eq!(report.fallback_pixels, 0);
    assert_eq!(report.painted_pixels, 21 * 21);
    assert_eq!(report.planes[0].average_color, Some(FLOOR_COLOR));

    for y in 0..h {
        for x in 0..w {
            let d = depth.get(x, y);
            assert!((d - 2000).abs() <= 300, "depth at ({x},{y}) = {d}");
            if region.contains(x, y) {
                assert_eq!(d, 2000);
            }
            assert_eq!(color.get(x, y), FLOOR_COLOR, "color at ({x},{y})");
        }
    }
    for stage in ["mask", "normals", "clusters", "planes", "depth", "color"] {
        assert!(report.timings.stage_ms(stage).is_some(), "missing {stage}");
    }
}

#[test]
fn tilted_floor_is_extended_under_the_object() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (100usize, 100usize);
    let intrinsics = centred_intrinsics(w);
    let floor = Plane::new(2000.0, 0.0, -0.5);
    let truth = plane_depth(w, h, &intrinsics, &floor);
    let mut depth = truth.clone();
    let region = Region::new(40, 40, 60, 60);
    place_object(&mut depth, &region, 1000);
    let confidence = full_confidence(w, h);

    let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
    let report = run(
        &mut inpainter,
        &mut depth,
        &confidence,
        None,
        intrinsics,
        region,
    );

    assert_eq!(report.outcome, InpaintOutcome::Inpainted);
    assert!(!report.planes.is_empty());
    assert_eq!(report.fallback_pixels, 0);
    for y in region.top..=region.bottom {
        for x in region.left..=region.right {
            let err = (depth.get(x, y) - truth.get(x, y)).abs();
            assert!(err <= 3, "({x},{y}) off by {err} mm");
        }
    }
    assert_eq!(depth.get(10, 10), truth.get(10, 10));
}

#[test]
fn rerunning_on_inpainted_frame_is_stable() {
    let (w, h) = (100usize, 100usize);
    let region = Region::new(40, 40, 60, 60);
    let mut depth = flat_floor(w, h, 2000);
    place_object(&mut depth, &region, 1200);
    let confidence = full_confidence(w, h);
    let intrinsics = centred_intrinsics(w);

    let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
    run(&mut inpainter, &mut depth, &confidence, None, intrinsics, region);
    let first = depth.clone();
    let report = run(&mut inpainter, &mut depth, &confidence, None, intrinsics, region);
    assert_eq!(report.outcome, InpaintOutcome::Inpainted);
    assert_eq!(depth, first);
}

#[test]
fn low_confidence_pixels_keep_depth_but_get_a_plane() {
    let (w, h) = (100usize, 100usize);
    let region = Region::new(40, 40, 60, 60);
    let mut depth = flat_floor(w, h, 2000);
    place_object(&mut depth, &region, 1200);
    let mut confidence = full_confidence(w, h);
    for y in 5..10 {
        for x in 5..10 {
            depth.set(x, y, 500);
            confidence[y * w + x] = 0;
        }
    }
    let intrinsics = centred_intrinsics(w);

    let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
    let report = run(&mut inpainter, &mut depth, &confidence, None, intrinsics, region);

    assert_eq!(report.masked_pixels, 21 * 21 + 25);
    assert_eq!(depth.get(7, 7), 500);
    assert_eq!(inpainter.workspace().cluster_map.get_xy(7, 7), Some(0));
    assert_eq!(depth.get(50, 50), 2000);
}

#[test]
fn frame_without_depth_reports_no_planes() {
    let (w, h) = (64usize, 48usize);
    let mut depth = DepthImage::new(w, h);
    let mut color = RgbImage::filled(w, h, Rgb::new(1, 2, 3));
    let confidence = full_confidence(w, h);
    let region = Region::new(20, 20, 30, 30);

    let mut inpainter = Inpainter::new(w, h, identity_params());
    let report = run(
        &mut inpainter,
        &mut depth,
        &confidence,
        Some(&mut color),
        CameraIntrinsics::new(60.0, 60.0, 32.0, 24.0),
        region,
    );

    assert_eq!(report.outcome, InpaintOutcome::NoPlanes);
    assert_eq!(report.candidate_bins, 0);
    assert!(depth.data.iter().all(|&d| d == 0));
    assert!(color.data.iter().all(|&c| c == Rgb::new(1, 2, 3)));
}

#[test]
fn color_at_camera_resolution_is_painted_through_mapping() {
    let (w, h) = (160usize, 90usize);
    let region = Region::new(60, 30, 100, 60);
    let mut depth = flat_floor(w, h, 2000);
    place_object(&mut depth, &region, 1100);
    let confidence = full_confidence(w, h);
    let mapping = ColorMapping::default();
    let color_region = mapping
        .depth_region_to_color(&region, 640, 480)
        .expect("region maps into the color frame");
    assert_eq!(color_region, Region::new(240, 180, 403, 303));
    let mut color = floor_color(640, 480, Some(&color_region));
    // Rows above the depth field of view must be left alone.
    color.set(10, 10, OBJECT_COLOR);

    let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
    let report = run(
        &mut inpainter,
        &mut depth,
        &confidence,
        Some(&mut color),
        CameraIntrinsics::new(120.0, 120.0, 80.0, 45.0),
        region,
    );

    assert_eq!(report.outcome, InpaintOutcome::Inpainted);
    assert_eq!(
        report.painted_pixels,
        color_region.width() * color_region.height()
    );
    assert_eq!(report.input.color_region, Some(color_region));
    assert_eq!(report.planes[0].average_color, Some(FLOOR_COLOR));
    for y in color_region.top..=color_region.bottom {
        for x in color_region.left..=color_region.right {
            assert_eq!(color.get(x, y), FLOOR_COLOR);
        }
    }
    assert_eq!(color.get(10, 10), OBJECT_COLOR);
}

#[test]
fn report_serializes_to_camel_case_json() {
    let (w, h) = (100usize, 100usize);
    let region = Region::new(40, 40, 60, 60);
    let mut depth = flat_floor(w, h, 2000);
    let confidence = full_confidence(w, h);
    let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
    let report = run(
        &mut inpainter,
        &mut depth,
        &confidence,
        None,
        centred_intrinsics(w),
        region,
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"], "inpainted");
    assert_eq!(json["filledPixels"], 441);
    assert!(json["timings"]["totalMs"].as_f64().is_some());
    assert!(json["planes"][0]["support"].as_u64().unwrap() > 0);
}
