use depth_inpaint::image::ImageViewMut;
use depth_inpaint::prelude::*;

fn main() {
    // Demo stub: a flat synthetic floor with a box standing in the middle.
    let (w, h) = (160usize, 90usize);
    let mut depth = DepthImage::filled(w, h, 2000);
    let region = Region::new(60, 30, 100, 60);
    depth.fill_region(&region, 1200);
    let confidence = vec![255u8; w * h];
    let mut color = RgbImage::filled(640, 480, Rgb::new(120, 110, 100));

    let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
    let result = inpainter.process(InpaintFrame {
        depth: &mut depth,
        confidence: ImageU8::packed(w, h, &confidence),
        color: Some(&mut color),
        intrinsics: CameraIntrinsics::new(120.0, 120.0, 80.0, 45.0),
        region,
    });
    match result {
        Ok(report) => println!(
            "outcome={:?} planes={} filled={} latency_ms={:.3}",
            report.outcome,
            report.planes.len(),
            report.filled_pixels,
            report.timings.total_ms
        ),
        Err(err) => eprintln!("Error: {err}"),
    }
}
