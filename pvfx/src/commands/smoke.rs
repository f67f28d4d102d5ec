//! Smoke particle command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};

use pv_smoke::store::{StoreSummary, load, try_load, try_save};
use pv_smoke::{Renderer, Rgb8Frame, Simulator, SmokeSettings, SpawnInterval, VelocityRange};

use crate::scene::{DEFAULT_FPS, DEFAULT_RESOLUTION, Scene, read_config};
use crate::utils::{
    format_bytes, format_range, format_seconds, frame_progress_bar, parse_interval,
    parse_velocity, property_table,
};

#[derive(Subcommand)]
pub enum SmokeCommands {
    /// Simulate one frame of smoke into a particle cache
    Simulate {
        /// Cache written by the previous frame (omit for the first frame)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cache to write
        #[arg(short, long)]
        output: PathBuf,

        /// Video frames per second
        #[arg(long, default_value_t = DEFAULT_FPS)]
        fps: f64,

        /// Frame width in pixels
        #[arg(long, default_value_t = DEFAULT_RESOLUTION.0)]
        width: u32,

        /// Frame height in pixels
        #[arg(long, default_value_t = DEFAULT_RESOLUTION.1)]
        height: u32,

        /// Spawn interval of an active note as X_START:X_END (repeatable)
        #[arg(long = "note", value_name = "X_START:X_END", value_parser = parse_interval, allow_hyphen_values = true)]
        notes: Vec<SpawnInterval>,

        /// Particles spawned per active note
        #[arg(long)]
        new_per_note: Option<u32>,

        /// Spawn height in pixels (defaults to the bottom row)
        #[arg(long, allow_hyphen_values = true)]
        y_start: Option<f64>,

        /// Horizontal velocity range in pixels per second
        #[arg(long, value_name = "MIN:MAX", value_parser = parse_velocity, allow_hyphen_values = true)]
        vx: Option<VelocityRange>,

        /// Vertical velocity range in pixels per second
        #[arg(long, value_name = "MIN:MAX", value_parser = parse_velocity, allow_hyphen_values = true)]
        vy: Option<VelocityRange>,

        /// Seed for reproducible spawning
        #[arg(long)]
        seed: Option<u64>,

        /// Smoke settings file (YAML or JSON); flags override it
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },

    /// Composite a particle cache onto an image
    Render {
        /// Particle cache to draw (a missing cache draws nothing)
        #[arg(short, long)]
        cache: PathBuf,

        /// Image to write
        #[arg(short, long)]
        output: PathBuf,

        /// Image to draw on (defaults to a black frame)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Frame width when no image is given
        #[arg(long, default_value_t = DEFAULT_RESOLUTION.0)]
        width: u32,

        /// Frame height when no image is given
        #[arg(long, default_value_t = DEFAULT_RESOLUTION.1)]
        height: u32,

        /// Intensity multiplier (10 replaces the center pixel)
        #[arg(long)]
        intensity: Option<f64>,

        /// Smoke settings file (YAML or JSON); flags override it
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },

    /// Display information about a particle cache
    Info {
        /// Path to the cache file
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Simulate and render every frame of a scene
    Sequence {
        /// Scene file (YAML or JSON)
        scene: PathBuf,

        /// Directory for rendered frames
        #[arg(short, long, default_value = "frames")]
        output_dir: PathBuf,

        /// Seed for reproducible spawning
        #[arg(long)]
        seed: Option<u64>,

        /// Keep every frame's particle cache instead of only the last
        #[arg(long)]
        keep_cache: bool,
    },
}

pub fn execute(command: SmokeCommands, quiet: bool) -> Result<()> {
    match command {
        SmokeCommands::Simulate {
            input,
            output,
            fps,
            width,
            height,
            notes,
            new_per_note,
            y_start,
            vx,
            vy,
            seed,
            settings,
        } => {
            let mut settings = load_settings(settings.as_deref())?;
            if let Some(n) = new_per_note {
                settings.new_per_note = n;
            }
            if y_start.is_some() {
                settings.y_start = y_start;
            }
            if let Some(vx) = vx {
                settings.vx = vx;
            }
            if let Some(vy) = vy {
                settings.vy = vy;
            }
            let simulator = Simulator::new(settings.params(fps, width, height, notes))
                .context("Invalid simulation parameters")?;
            execute_simulate(&simulator, input, output, seed)
        }
        SmokeCommands::Render {
            cache,
            output,
            image,
            width,
            height,
            intensity,
            settings,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let intensity = intensity.unwrap_or(settings.intensity);
            execute_render(cache, output, image, (width, height), intensity)
        }
        SmokeCommands::Info { file, json } => execute_info(file, json),
        SmokeCommands::Sequence {
            scene,
            output_dir,
            seed,
            keep_cache,
        } => execute_sequence(scene, output_dir, seed, keep_cache, quiet),
    }
}

fn load_settings(path: Option<&Path>) -> Result<SmokeSettings> {
    match path {
        Some(path) => read_config(path),
        None => Ok(SmokeSettings::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn execute_simulate(
    simulator: &Simulator,
    input: Option<PathBuf>,
    output: PathBuf,
    seed: Option<u64>,
) -> Result<()> {
    let mut particles = match &input {
        Some(path) => load(path),
        None => Vec::new(),
    };
    let loaded = particles.len();

    let mut rng = make_rng(seed);
    let report = simulator.step(&mut rng, &mut particles);
    try_save(&output, &particles)
        .with_context(|| format!("Failed to write particle cache: {}", output.display()))?;

    println!(
        "✓ Simulated frame into '{}': {} particles ({} loaded, {} spawned, {} culled)",
        style(output.display()).cyan(),
        style(report.saved).green(),
        loaded,
        report.spawned,
        report.out_of_bounds + report.expired
    );
    Ok(())
}

fn execute_render(
    cache: PathBuf,
    output: PathBuf,
    base: Option<PathBuf>,
    size: (u32, u32),
    intensity: f64,
) -> Result<()> {
    let mut frame = match &base {
        Some(path) => {
            let img = image::open(path)
                .with_context(|| format!("Failed to open image: {}", path.display()))?;
            Rgb8Frame::from(img.to_rgb8())
        }
        None => Rgb8Frame::new(size.0, size.1),
    };

    let report = Renderer::new(intensity).render(&mut frame, &cache);

    frame
        .into_image()
        .save(&output)
        .with_context(|| format!("Failed to write image: {}", output.display()))?;

    println!(
        "✓ Rendered {} of {} particles onto '{}'",
        style(report.stamped).green(),
        report.loaded,
        style(output.display()).cyan()
    );
    Ok(())
}

fn execute_info(path: PathBuf, json: bool) -> Result<()> {
    let particles = try_load(&path)
        .with_context(|| format!("Failed to read particle cache: {}", path.display()))?;
    let summary = StoreSummary::from_particles(&particles);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    println!("\n{}", style("Particle Cache Information").bold().underlined());
    println!("File: {}", style(path.display()).cyan());
    println!("Size: {}", style(format_bytes(size)).yellow());
    println!("Particles: {}", style(summary.count).green());

    if summary.count > 0 {
        let bounds = summary
            .bounds
            .map(|[x0, y0, x1, y1]| format!("({x0:.1}, {y0:.1}) .. ({x1:.1}, {y1:.1})"))
            .unwrap_or_default();
        let table = property_table([
            ("Age", format_range(summary.age_range, "s")),
            ("Mean age", format_seconds(f64::from(summary.mean_age))),
            ("Mean speed", format!("{:.3} px/frame", summary.mean_speed)),
            ("Bounds", bounds),
        ]);
        println!();
        table.printstd();
    }

    Ok(())
}

fn execute_sequence(
    scene_path: PathBuf,
    output_dir: PathBuf,
    seed: Option<u64>,
    keep_cache: bool,
    quiet: bool,
) -> Result<()> {
    let scene = Scene::load(&scene_path)?;
    let cache_dir = output_dir.join("cache");
    fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create directory: {}", cache_dir.display()))?;

    let total = scene.frame_count();
    let renderer = Renderer::new(scene.smoke.intensity);
    let mut rng = make_rng(seed);
    let mut previous: Option<PathBuf> = None;

    info!(
        "Rendering {} frames at {}x{}, {} fps",
        total, scene.width, scene.height, scene.fps
    );
    let pb = frame_progress_bar(total, quiet);

    for frame in 0..total {
        let params = scene.smoke.params(
            scene.fps,
            scene.width,
            scene.height,
            scene.active_notes(frame),
        );
        let simulator = Simulator::new(params).context("Invalid scene parameters")?;

        let cache = cache_dir.join(format!("frame_{frame:05}.smoke"));
        let input = previous.clone().unwrap_or_default();
        simulator.simulate(&mut rng, &input, &cache);

        let mut canvas = Rgb8Frame::filled(scene.width, scene.height, scene.background);
        renderer.render(&mut canvas, &cache);

        let image_path = output_dir.join(format!("frame_{frame:05}.png"));
        canvas
            .into_image()
            .save(&image_path)
            .with_context(|| format!("Failed to write image: {}", image_path.display()))?;

        if !keep_cache
            && let Some(old) = previous.take()
            && let Err(e) = fs::remove_file(&old)
        {
            log::warn!("Failed to remove cache {}: {e}", old.display());
        }
        previous = Some(cache);
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!(
        "✓ Rendered {} frames into '{}'",
        style(total).green(),
        style(output_dir.display()).cyan()
    );
    Ok(())
}
