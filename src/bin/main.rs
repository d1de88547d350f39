//! Babel Book CLI
//!
//! Inspect page layout, run the animation headlessly and export posed books.

use babel_book::export::{write_scene, ExportFormat};
use babel_book::layout::{distribute, page_pose};
use babel_book::{
    BookConfig, BookOptions, BookScene, BookWidget, Emotion, FlipDirection, ManualClock,
    ParticleField, PoissonDiskSampler,
};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "babel-book")]
#[command(author, version, about = "Drive and export a decorative 3D book", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print stack membership, depth offset and pose for every page
    Layout {
        /// Total pages (clamped to 10..=100)
        #[arg(short, long, default_value = "30")]
        pages: usize,

        /// Split point; defaults to the middle of the book
        #[arg(short, long)]
        current: Option<usize>,

        /// Front and back hinge angle in radians
        #[arg(long, default_value = "0.0")]
        hinge: f32,
    },

    /// Run the widget on a simulated clock and print its final state
    Simulate {
        /// Widget options as JSON (camelCase fields)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Open the covers before flipping
        #[arg(long)]
        open: bool,

        /// Pages to flip
        #[arg(short, long, default_value = "1")]
        flips: usize,

        /// Flip direction (forward/backward)
        #[arg(short, long, default_value = "forward")]
        direction: FlipDirection,

        /// Duration of each flip in milliseconds
        #[arg(long, default_value = "500")]
        flip_ms: f64,

        /// Play an emotion effect (focus/drift/paradox)
        #[arg(short, long)]
        emotion: Option<Emotion>,

        /// Simulated run time in milliseconds
        #[arg(long, default_value = "5000")]
        duration_ms: f64,

        /// Frame step in milliseconds
        #[arg(long, default_value = "16")]
        step_ms: f64,
    },

    /// Draw Poisson-disk points and print them as JSON
    Sample {
        #[arg(short = 'n', long, default_value = "200")]
        count: usize,

        /// Box size as width,height,depth
        #[arg(long, value_parser = parse_extent, default_value = "2.4,2.0,0.3")]
        extent: [f32; 3],

        #[arg(long, default_value = "0.1")]
        min_distance: f32,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Pose a book from a config and write it as a mesh
    Export {
        /// Book config as JSON (camelCase fields); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "glb")]
        format: OutputFormat,

        /// Add this many particles when the covers are open
        #[arg(long, default_value = "0")]
        particles: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Binary glTF format
    Glb,
    /// Wavefront OBJ format
    Obj,
}

fn parse_extent(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid extent '{}': {}", s, e))?;
    match parts.as_slice() {
        [w, h, d] => Ok([*w, *h, *d]),
        _ => Err(format!("Invalid extent '{}'. Use width,height,depth", s)),
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout {
            pages,
            current,
            hinge,
        } => {
            show_layout(pages, current, hinge)?;
        }
        Commands::Simulate {
            options,
            open,
            flips,
            direction,
            flip_ms,
            emotion,
            duration_ms,
            step_ms,
        } => {
            let plan = SimulationPlan {
                open,
                flips,
                direction,
                flip_ms,
                emotion,
                duration_ms,
                step_ms,
            };
            simulate(options.as_deref(), &plan)?;
        }
        Commands::Sample {
            count,
            extent,
            min_distance,
            seed,
        } => {
            sample(count, extent, min_distance, seed)?;
        }
        Commands::Export {
            config,
            output,
            format,
            particles,
            seed,
        } => {
            export_book(config.as_deref(), &output, format, particles, seed)?;
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutRow {
    index: usize,
    stack: babel_book::layout::Stack,
    offset: f32,
    rotation_y: Option<f32>,
    /// Pivot-space position of the page's hinge edge after the depth offset.
    position: Option<[f32; 3]>,
}

fn show_layout(
    pages: usize,
    current: Option<usize>,
    hinge: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BookConfig {
        page_count: pages,
        current_page: current.unwrap_or(pages / 2),
        front_hinge: hinge,
        back_hinge: hinge,
        ..BookConfig::default()
    };
    config.normalize();
    info!(
        "Layout for {} pages split at {} ({} back, {} front)",
        config.page_count,
        config.current_page,
        config.back_page_count(),
        config.front_page_count()
    );

    let rows: Vec<LayoutRow> = distribute(config.current_page, config.page_count)
        .into_iter()
        .map(|slot| {
            let pose = page_pose(&config, slot.index);
            LayoutRow {
                index: slot.index,
                stack: slot.stack,
                offset: slot.offset,
                rotation_y: pose.map(|p| p.rotation_y),
                position: pose.map(|p| p.transform().transform_point3(Vec3::ZERO).to_array()),
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

struct SimulationPlan {
    open: bool,
    flips: usize,
    direction: FlipDirection,
    flip_ms: f64,
    emotion: Option<Emotion>,
    duration_ms: f64,
    step_ms: f64,
}

fn simulate(options_path: Option<&Path>, plan: &SimulationPlan) -> Result<(), Box<dyn std::error::Error>> {
    let options = match options_path {
        Some(path) => {
            info!("Loading widget options from {:?}", path);
            serde_json::from_str::<BookOptions>(&fs::read_to_string(path)?)?
        }
        None => BookOptions::default(),
    };

    let flipped = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&flipped);
    let options = options.on_flip(move |direction| {
        counter.set(counter.get() + 1);
        info!("Flip {}", direction);
    });

    let clock = ManualClock::new();
    let mut widget = BookWidget::new(options, clock.clone());

    if plan.open {
        widget.open_book(1000.0);
    }
    if let Some(emotion) = plan.emotion {
        widget.trigger_emotion(emotion);
    }
    if plan.flips > 0 {
        let outcome = widget.flip_page_run(plan.flips, plan.direction, plan.flip_ms);
        info!("Flip run of {} pages: {:?}", plan.flips, outcome);
    }

    let step = plan.step_ms.max(1.0);
    let mut elapsed = 0.0;
    while elapsed < plan.duration_ms {
        clock.advance(step);
        widget.tick();
        elapsed += step;
    }

    info!(
        "Simulated {:.0}ms: {} flip notifications, page {}",
        elapsed,
        flipped.get(),
        widget.config().current_page
    );
    println!("{}", serde_json::to_string_pretty(&widget.get_state())?);

    if let Some(report) = widget.dispose() {
        info!("Released {} resources", report.total());
    }
    Ok(())
}

fn sample(
    count: usize,
    extent: [f32; 3],
    min_distance: f32,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let [width, height, depth] = extent;
    let mut sampler = PoissonDiskSampler::new(width, height, depth, min_distance);
    let cloud = sampler.sample(count, &mut rng_from(seed));

    info!(
        "Sampled {} points ({} accepted, {} padded)",
        cloud.len(),
        cloud.accepted_points().len(),
        cloud.padded_points().len()
    );

    let points: Vec<[f32; 3]> = cloud.points.iter().map(|p| p.to_array()).collect();
    println!("{}", serde_json::to_string(&points)?);
    Ok(())
}

fn export_book(
    config_path: Option<&Path>,
    path: &Path,
    format: OutputFormat,
    particles: usize,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(config_path) => {
            info!("Loading book config from {:?}", config_path);
            BookConfig::from_json(&fs::read_to_string(config_path)?)?
        }
        None => BookConfig::default(),
    };

    let mut scene = BookScene::build(&config, &[]);
    if particles > 0 {
        let field = ParticleField::seed(&config.dimensions, particles, &mut rng_from(seed));
        scene.add_particles(field.visible_positions(
            config.particles_enabled,
            config.particle_intensity,
            config.front_hinge,
            config.back_hinge,
        ));
    }

    info!(
        "Scene has {} vertices, {} triangles",
        scene.total_vertices(),
        scene.total_triangles()
    );
    let format = match format {
        OutputFormat::Glb => ExportFormat::Glb,
        OutputFormat::Obj => ExportFormat::Obj,
    };
    write_scene(&scene, path, format)?;
    Ok(())
}
