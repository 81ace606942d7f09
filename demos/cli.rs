//! Command-line interface for pigment_scan
//!
//! Runs the patch analysis on a VIS + IR/UV pair, or on a gallery sample,
//! and prints the JSON report.

use pigment_scan::gallery::{find_sample, DemoGallery};
use pigment_scan::{analyze_patch, ColorFamily, PatchAnalysis, PipelineConfig};
use std::{env, fs, path::{Path, PathBuf}, process};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Options {
    positional: Vec<String>,
    config_path: Option<PathBuf>,
    debug_output_dir: Option<PathBuf>,
    gallery_dir: Option<PathBuf>,
    sample: Option<String>,
    hypothesis: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let config = match &options.config_path {
        Some(path) => PipelineConfig::from_json_file(path).unwrap_or_else(|e| fail(&e.to_string())),
        None => PipelineConfig::default(),
    };

    let (analysis, stem) = if let Some(name) = &options.sample {
        let sample = find_sample(name).unwrap_or_else(|| fail(&format!("Unknown sample '{}'", name)));
        let gallery = DemoGallery::new(
            options.gallery_dir.clone().unwrap_or_else(|| PathBuf::from("demo_images")),
        );
        let images = gallery.load(sample).unwrap_or_else(|e| report_error(e));
        let analysis = analyze_patch(&images.vis, Some(&images.aux.luminance), sample.family, &config)
            .unwrap_or_else(|e| report_error(e));
        (analysis, sample.base_name.to_string())
    } else {
        if options.positional.len() != 3 {
            print_help(&args[0]);
            process::exit(1);
        }
        let vis_path = Path::new(&options.positional[0]);
        let aux_path = Path::new(&options.positional[1]);
        let family = ColorFamily::from_label(&options.positional[2]).unwrap_or_else(|e| report_error(e));

        let images = pigment_scan::image_loader::load_pair(vis_path, aux_path, family.aux_modality())
            .unwrap_or_else(|e| report_error(e));
        let analysis = analyze_patch(&images.vis, Some(&images.aux.luminance), family, &config)
            .unwrap_or_else(|e| report_error(e));
        let stem = vis_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("patch")
            .to_string();
        (analysis, stem)
    };

    print_result(&analysis, options.hypothesis.as_deref());

    if let Some(dir) = &options.debug_output_dir {
        save_debug_output(&analysis, dir, &stem);
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                options.config_path = Some(PathBuf::from(next_value(args, &mut i, "--config")));
            }
            "--debug" => {
                // Optional directory argument
                if i + 1 < args.len() && !args[i + 1].starts_with("--") && is_directory_arg(&args[i + 1]) {
                    options.debug_output_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    options.debug_output_dir = Some(PathBuf::from("debug"));
                }
            }
            "--gallery" => {
                options.gallery_dir = Some(PathBuf::from(next_value(args, &mut i, "--gallery")));
            }
            "--sample" => {
                options.sample = Some(next_value(args, &mut i, "--sample"));
            }
            "--hypothesis" => {
                options.hypothesis = Some(next_value(args, &mut i, "--hypothesis"));
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => options.positional.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }
    options
}

fn next_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    match args.get(*i) {
        Some(value) => value.clone(),
        None => fail(&format!("{} expects a value", flag)),
    }
}

/// An argument after `--debug` is a directory unless it looks like an image
fn is_directory_arg(arg: &str) -> bool {
    Path::new(arg)
        .extension()
        .and_then(|e| e.to_str())
        .map_or(true, |ext| !pigment_scan::image_loader::is_supported_extension(ext))
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn report_error(error: pigment_scan::AnalysisError) -> ! {
    eprintln!("Analysis failed: {}", error);
    eprintln!("Suggestion: {}", error.user_message());
    process::exit(1);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <vis_image> <aux_image> <color>", program_name);
    eprintln!("       {} [OPTIONS] --sample <name> [--gallery <dir>]", program_name);
    eprintln!();
    eprintln!("Classify a manuscript ink patch from a visible-light photograph and");
    eprintln!("an IR (black/blue) or UV (red) photograph of the same patch.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <FILE>       Load thresholds from a JSON configuration");
    eprintln!("  --debug [DIR]         Save the mask and extracted pigment (default: debug/)");
    eprintln!("  --sample <NAME>       Analyse a gallery sample, e.g. I32_black");
    eprintln!("  --gallery <DIR>       Gallery directory (default: demo_images/)");
    eprintln!("  --hypothesis <TEXT>   Compare your own hypothesis with the prediction");
    eprintln!("  --help, -h            Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} I32_black_VIS.bmp I32_black_IR.bmp black", program_name);
    eprintln!("  {} --sample VII78_red --hypothesis \"Mineral Red\"", program_name);
}

fn save_debug_output(analysis: &PatchAnalysis, output_dir: &Path, base_name: &str) {
    if let Err(e) = fs::create_dir_all(output_dir) {
        eprintln!("Warning: Failed to create output directory: {}", e);
        return;
    }

    let mask_path = output_dir.join(format!("{}_mask.png", base_name));
    match analysis.mask.save(&mask_path) {
        Ok(_) => eprintln!("Debug: Saved mask to {}", mask_path.display()),
        Err(e) => eprintln!("Warning: Failed to save mask: {}", e),
    }

    let extracted_path = output_dir.join(format!("{}_extracted.png", base_name));
    match analysis.extracted.save(&extracted_path) {
        Ok(_) => eprintln!("Debug: Saved extracted pigment to {}", extracted_path.display()),
        Err(e) => eprintln!("Warning: Failed to save extracted pigment: {}", e),
    }
}

fn print_result(analysis: &PatchAnalysis, hypothesis: Option<&str>) {
    // JSON to stdout for programmatic use
    match serde_json::to_string_pretty(&analysis.report()) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    // Summary to stderr for human reading
    let modality = analysis.family.aux_modality();
    eprintln!();
    eprintln!("Pigment Analysis Summary:");
    eprintln!("  Target: {} ({} image)", analysis.family, modality);
    eprintln!("  Ink pixels: {}", analysis.metrics.ink_pixel_count);

    match &analysis.classification {
        Some(classification) => {
            eprintln!("  {} score: {:.3}", modality, classification.score);
            eprintln!("  Conclusion: {}", classification.pigment);
            if let Some(guess) = hypothesis {
                if classification.agrees_with(guess) {
                    eprintln!("  You and the analysis agree.");
                } else {
                    eprintln!("  Differing opinions: you said '{}'.", guess);
                }
            }
        }
        None if !analysis.metrics.has_ink() => {
            eprintln!("  Warning: No {} pigment found. Check the target color.", analysis.family);
        }
        None => {
            eprintln!("  Warning: No {} measurement available.", modality);
        }
    }
}
