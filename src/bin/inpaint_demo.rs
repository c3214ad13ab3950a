use depth_inpaint::camera::CameraPose;
use depth_inpaint::config::{load_config, RuntimeConfig};
use depth_inpaint::image::io::{
    load_confidence_png, load_depth_png, load_rgb_png, save_depth_png, save_rgb_png,
    write_json_file, GrayImageU8,
};
use depth_inpaint::image::{DepthImage, RgbImage};
use depth_inpaint::{resolve_tap, InpaintFrame, InpaintReport, Inpainter};
use std::env;
use std::error::Error;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "inpaint_demo".to_string());
    let Some(config_path) = args.next() else {
        return Err(format!("Usage: {program} <config.json>").into());
    };
    let config = load_config(Path::new(&config_path))?;

    let mut depth = load_depth_png(&config.input.depth)?;
    let (w, h) = (depth.w, depth.h);
    let confidence = match &config.input.confidence {
        Some(path) => load_confidence_png(path)?,
        None => GrayImageU8::new(w, h, vec![u8::MAX; w * h]),
    };
    let mut color = match &config.input.color {
        Some(path) => Some(load_rgb_png(path)?),
        None => None,
    };
    let intrinsics = config.depth_intrinsics(w, h);

    match config.depth_region(w, h) {
        Some(region) => {
            let mut inpainter = Inpainter::new(w, h, config.params.clone());
            let report = inpainter.process(InpaintFrame {
                depth: &mut depth,
                confidence: confidence.as_view(),
                color: color.as_mut(),
                intrinsics,
                region,
            })?;
            print_summary(&report);
            if let Some(path) = &config.output.report {
                write_json_file(path, &report)?;
                println!("JSON report written to {}", path.display());
            }
        }
        None => println!("No region configured; skipping inpainting"),
    }

    if let Some(tap) = config.tap {
        let placed = resolve_tap(
            tap,
            &depth,
            &intrinsics,
            &CameraPose::identity(),
            &config.tap_params,
        );
        match placed {
            Some(p) => {
                let up = p.up();
                println!(
                    "Tap [{:.3}, {:.3}]: position=[{:.3}, {:.3}, {:.3}] m up=[{:.3}, {:.3}, {:.3}]",
                    tap[0], tap[1], p.position.x, p.position.y, p.position.z, up.x, up.y, up.z
                );
            }
            None => println!("Tap [{:.3}, {:.3}]: undefined", tap[0], tap[1]),
        }
    }

    save_outputs(&config, &depth, color.as_ref())?;
    Ok(())
}

fn print_summary(report: &InpaintReport) {
    println!("Inpaint summary");
    println!("  outcome: {:?}", report.outcome);
    println!(
        "  masked={} normals={} candidates={} cores={} clusters={}",
        report.masked_pixels,
        report.defined_normals,
        report.candidate_bins,
        report.core_bins,
        report.clusters.len()
    );
    for (i, plane) in report.planes.iter().enumerate() {
        let color = plane
            .average_color
            .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  plane {}: z = {:.1} + {:.4}·x + {:.4}·y support={} color={}",
            i, plane.a, plane.b, plane.c, plane.support, color
        );
    }
    println!(
        "  filled={} fallback={} painted={}",
        report.filled_pixels, report.fallback_pixels, report.painted_pixels
    );
    let stages: Vec<String> = report
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "  timings (ms): {} total={:.3}",
        stages.join(" "),
        report.timings.total_ms
    );
}

fn save_outputs(
    config: &RuntimeConfig,
    depth: &DepthImage,
    color: Option<&RgbImage>,
) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &config.output.depth {
        save_depth_png(depth, path)?;
        println!("Depth written to {}", path.display());
    }
    if let (Some(path), Some(color)) = (&config.output.color, color) {
        save_rgb_png(color, path)?;
        println!("Color written to {}", path.display());
    }
    Ok(())
}
