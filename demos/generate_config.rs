//! Generate default pigment analysis configuration file
//!
//! Creates a JSON config with all default thresholds

use pigment_scan::config::FamilyThreshold;
use pigment_scan::{ColorFamily, PipelineConfig};
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} calibration/manuscript.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = PipelineConfig::default_manuscript();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            for family in ColorFamily::ALL {
                eprintln!(
                    "  {:<5} HSV bands: {}",
                    family.name(),
                    describe(config.segmentation.threshold(family))
                );
            }
            eprintln!(
                "  Morphology: {0}x{0} kernel, {1} boundary erosions",
                config.segmentation.morph_kernel_size,
                config.segmentation.boundary_erosion_iterations
            );
            let cls = &config.classification;
            eprintln!(
                "  Black: iron gall IR > {:.2}, carbon IR < {:.2}",
                cls.iron_gall_min_ir, cls.carbon_max_ir
            );
            eprintln!("  Blue:  plant-based IR > {:.2}", cls.plant_blue_min_ir);
            eprintln!("  Red:   fluorescent UV > {:.2}", cls.fluorescent_min_uv);
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}

fn describe(threshold: &FamilyThreshold) -> String {
    threshold
        .bands
        .iter()
        .map(|band| format!("{:?}..={:?}", band.lower, band.upper))
        .collect::<Vec<_>>()
        .join(" | ")
}
