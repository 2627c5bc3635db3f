use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use epdimage::analysis::{compare_profiles, hypothesis, Hypothesis};
use epdimage::bmp::{load_image, write_bmp};
use epdimage::compare::{side_by_side, DEFAULT_GAP_WIDTH};
use epdimage::config::{self, DisplayProfile};
use epdimage::grid::Grid;
use epdimage::palette::{Palette, Rgb};
use epdimage::source::{list_arrays, read_array};
use epdimage::stats::histogram;
use epdimage::transform::{resize_nearest, Rotation};

mod profile;
mod report;

use profile::{load_profile, ProfileArgs};
use report::{CompareReport, HypothesisReport, ImageReport};

/// Four-color e-paper frame buffer decoding CLI
#[derive(Parser)]
#[command(name = "epdimage", version)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Log decoding details
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Terminal,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in panel profiles
    Profiles,
    /// List the byte arrays declared in a source file
    List {
        /// C/C++ source holding the image arrays
        #[arg(long)]
        source: PathBuf,
    },
    /// Decode arrays into BMP images
    Convert {
        /// C/C++ source holding the image arrays
        #[arg(long)]
        source: PathBuf,
        /// Array names to convert (e.g. gImage_1)
        #[arg(long, required = true, num_args = 1..)]
        array: Vec<String>,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Rotate the decoded image (0, 90, 180, 270)
        #[arg(long, default_value = "0")]
        rotate: Rotation,
        /// Resize to the profile's display size before writing
        #[arg(long)]
        display: bool,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Decode one array under two profiles and compare the readings
    Compare {
        /// C/C++ source holding the image arrays
        #[arg(long)]
        source: PathBuf,
        /// Array name to compare
        #[arg(long)]
        array: String,
        /// First profile (built-in name or .toml path)
        #[arg(long, default_value = "epd579-horizontal")]
        first: String,
        /// Second profile (built-in name or .toml path)
        #[arg(long, default_value = "epd579-vertical")]
        second: String,
        /// File name label for the first reading
        #[arg(long, default_value = "horizontal")]
        first_label: String,
        /// File name label for the second reading
        #[arg(long, default_value = "vertical")]
        second_label: String,
        /// Gap between comparison panels in pixels
        #[arg(long, default_value_t = DEFAULT_GAP_WIDTH)]
        gap: usize,
        /// Rotation applied to the second reading for the rotated view
        #[arg(long, default_value = "270")]
        rotate: Rotation,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value = "terminal")]
        format: Format,
    },
    /// Color statistics of existing images
    Stats {
        /// Image files (BMP or PNG)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Report format
        #[arg(long, value_enum, default_value = "terminal")]
        format: Format,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        Command::Profiles => cmd_profiles(),
        Command::List { source } => cmd_list(&source),
        Command::Convert {
            source,
            array,
            profile,
            rotate,
            display,
            output_dir,
        } => cmd_convert(&source, &array, &profile, rotate, display, &output_dir),
        Command::Compare {
            source,
            array,
            first,
            second,
            first_label,
            second_label,
            gap,
            rotate,
            output_dir,
            format,
        } => {
            let first = load_profile(&first)?;
            let second = load_profile(&second)?;
            cmd_compare(
                &source,
                &array,
                (&first, &first_label),
                (&second, &second_label),
                gap,
                rotate,
                &output_dir,
                format,
            )
        }
        Command::Stats { files, format } => cmd_stats(&files, format),
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn cmd_profiles() -> Result<()> {
    println!("Built-in panel profiles:");
    println!();
    for name in config::BUILTIN_PROFILES {
        let Some(p) = config::builtin_profile(name) else {
            continue;
        };
        let display = p
            .display_size()
            .map(|(w, h)| format!("{w}x{h}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<22} {:>4}x{:<4} {:<13} {:>7} bytes  display {}",
            name,
            p.width,
            p.height,
            p.scan_order.name(),
            p.decode_config().frame_bytes(),
            display
        );
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn cmd_list(source: &Path) -> Result<()> {
    let text = read_source(source)?;
    let decls = list_arrays(&text);
    if decls.is_empty() {
        println!("no array declarations in {}", source.display());
        return Ok(());
    }
    println!("  {:<24} {:>10} {:>10}", "Array", "Declared", "Parsed");
    for decl in &decls {
        let declared = decl
            .declared_len
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let parsed = match decl.bytes() {
            Ok(bytes) => bytes.len().to_string(),
            Err(e) => {
                log::debug!("{}: {e}", decl.name);
                "error".to_string()
            }
        };
        println!("  {:<24} {:>10} {:>10}", decl.name, declared, parsed);
    }
    Ok(())
}

/// Resize a decoded frame to the profile's presentation size, if it has one.
fn for_display(grid: &Grid, profile: &DisplayProfile) -> Grid {
    match profile.display_size() {
        Some((w, h)) => resize_nearest(grid, w, h),
        None => grid.clone(),
    }
}

fn decode_array(source: &Path, array: &str, profile: &DisplayProfile) -> Result<Hypothesis> {
    let bytes = read_array(source, array)
        .with_context(|| format!("extracting {array} from {}", source.display()))?;
    let h = hypothesis(&bytes, &profile.decode_config(), profile.scan_order)
        .with_context(|| format!("decoding {array} as {}", profile.name))?;
    Ok(h)
}

fn cmd_convert(
    source: &Path,
    arrays: &[String],
    profile_args: &ProfileArgs,
    rotate: Rotation,
    display: bool,
    output_dir: &Path,
) -> Result<()> {
    let profile = profile_args.resolve()?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut failed = 0usize;
    for array in arrays {
        let path = output_dir.join(format!("{array}.bmp"));
        let result = decode_array(source, array, &profile).and_then(|h| {
            let grid = if display {
                for_display(h.grid(), &profile)
            } else {
                h.grid().clone()
            };
            let grid = rotate.apply(&grid);
            write_bmp(&grid, &path).with_context(|| format!("writing {}", path.display()))?;
            Ok(grid)
        });
        match result {
            Ok(grid) => log::info!(
                "{array}: wrote {} ({}x{})",
                path.display(),
                grid.width,
                grid.height
            ),
            Err(e) => {
                log::error!("{array}: {e:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} arrays failed to convert", arrays.len());
    }
    Ok(())
}

/// Write one output image; failures are logged so the remaining outputs are
/// still attempted.
fn write_output(grid: &Grid, path: &Path, outputs: &mut Vec<String>) -> bool {
    match write_bmp(grid, path) {
        Ok(()) => {
            log::info!("wrote {} ({}x{})", path.display(), grid.width, grid.height);
            outputs.push(path.display().to_string());
            true
        }
        Err(e) => {
            log::error!("writing {}: {e}", path.display());
            false
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_compare(
    source: &Path,
    array: &str,
    (first, first_label): (&DisplayProfile, &str),
    (second, second_label): (&DisplayProfile, &str),
    gap: usize,
    rotate: Rotation,
    output_dir: &Path,
    format: Format,
) -> Result<()> {
    let bytes = read_array(source, array)
        .with_context(|| format!("extracting {array} from {}", source.display()))?;
    let cmp = compare_profiles(&bytes, first, second)
        .with_context(|| format!("decoding {array} as {} and {}", first.name, second.name))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let a = for_display(cmp.first.grid(), first);
    let b = for_display(cmp.second.grid(), second);
    let b_rotated = rotate.apply(&b);
    let gap_color = Rgb::GRAY;
    let file = |suffix: String| output_dir.join(format!("{array}_{suffix}.bmp"));

    let mut outputs = Vec::new();
    let written = [
        write_output(&a, &file(first_label.to_string()), &mut outputs),
        write_output(&b, &file(second_label.to_string()), &mut outputs),
        write_output(&b_rotated, &file(format!("{second_label}_rotated")), &mut outputs),
        write_output(
            &side_by_side(&a, &b, gap_color, gap),
            &file(format!("comparison_{first_label}_vs_{second_label}")),
            &mut outputs,
        ),
        write_output(
            &side_by_side(&a, &b_rotated, gap_color, gap),
            &file(format!("comparison_{first_label}_vs_rotated")),
            &mut outputs,
        ),
    ];
    let failed = written.iter().filter(|ok| !**ok).count();

    let report = CompareReport {
        array: array.to_string(),
        first: HypothesisReport::new(&first.name, &cmp.first, &first.palette),
        second: HypothesisReport::new(&second.name, &cmp.second, &second.palette),
        diff: cmp.diff,
        differing_pixels: cmp.differing_pixels,
        outputs,
    };
    match format {
        Format::Terminal => report::print_compare(&report, &first.palette),
        Format::Json => println!("{}", report::to_json(&report)),
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} output images could not be written", written.len());
    }
    Ok(())
}

fn cmd_stats(files: &[PathBuf], format: Format) -> Result<()> {
    let palette = Palette::default();
    let mut reports = Vec::new();
    let mut failed = 0usize;
    for path in files {
        match load_image(path) {
            Ok(grid) => {
                let label = path.display().to_string();
                reports.push(ImageReport::new(
                    &label,
                    grid.width,
                    grid.height,
                    &histogram(&grid),
                    &palette,
                ));
            }
            Err(e) => {
                log::error!("{}: {e}", path.display());
                failed += 1;
            }
        }
    }

    match format {
        Format::Terminal => {
            for r in &reports {
                report::print_image(r);
                println!();
            }
        }
        Format::Json => println!("{}", report::to_json(&reports)),
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} images could not be read", files.len());
    }
    Ok(())
}
