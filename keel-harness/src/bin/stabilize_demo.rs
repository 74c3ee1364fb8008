use clap::Parser;
use keel::{StabilizationEngine, StabilizerConfig, SurfaceGeometry};
use keel_harness::tilt_profiles::TestTilts;
use keel_harness::ProfileGravitySource;
use keel_math::Extent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Command line arguments for the stabilization demo
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "KEEL stabilization demonstration with simulated tilt motions"
)]
struct Args {
    /// Tilt profile (steady, sway, twist, faceup)
    #[arg(short, long, default_value = "sway")]
    profile: String,

    /// Base tilt angle in radians
    #[arg(long, default_value_t = -1.7, allow_hyphen_values = true)]
    base_angle: f64,

    /// Run duration in seconds
    #[arg(short = 't', long, default_value_t = 6.0)]
    duration: f64,

    /// Gravity sampling rate in Hz
    #[arg(long, default_value_t = 30.0)]
    sample_rate: f64,

    /// Fraction of sensor ticks to drop (0.0 to 1.0)
    #[arg(long, default_value_t = 0.0)]
    dropout: f64,

    /// Seconds into the run at which to lock the display angle
    #[arg(long)]
    lock_at: Option<f64>,

    /// Seconds into the run at which to release the lock
    #[arg(long)]
    unlock_at: Option<f64>,

    /// View width and height in points
    #[arg(long, default_value_t = 390.0)]
    view_width: f64,
    #[arg(long, default_value_t = 200.0)]
    view_height: f64,

    /// Video width and height in pixels
    #[arg(long, default_value_t = 1280.0)]
    video_width: f64,
    #[arg(long, default_value_t = 720.0)]
    video_height: f64,

    /// Print every emitted transform
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("KEEL Stabilization Demo");
    println!("=======================");
    println!("Profile: {}", args.profile);
    println!("Duration: {} seconds", args.duration);
    println!("Sample rate: {} Hz", args.sample_rate);

    let tilts = TestTilts::new(args.base_angle);
    let motion = tilts
        .get_motion(&args.profile)
        .ok_or_else(|| format!("Unknown tilt profile: {}", args.profile))?;
    println!("Motion: {}", motion.description());

    let mut source = ProfileGravitySource::new(motion, args.sample_rate);
    if args.dropout > 0.0 {
        source = source.with_dropout(args.dropout, 42);
    }

    let geometry = SurfaceGeometry::new(
        Extent::new(args.view_width, args.view_height),
        Extent::new(args.video_width, args.video_height),
    );
    let mut engine = StabilizationEngine::new(source, StabilizerConfig::default(), geometry)?;

    let baseline = engine.zero_rotation_transform();
    println!(
        "Baseline transform: scale {:.4}, rotation {:.4} rad",
        baseline.scale_x, baseline.rotation
    );

    let emitted = Arc::new(AtomicUsize::new(0));
    let last_transform = Arc::new(Mutex::new(baseline));
    let emitted_sink = emitted.clone();
    let last_sink = last_transform.clone();
    let verbose = args.verbose;

    println!("\nStarting engine...");
    engine.start(move |transform| {
        let count = emitted_sink.fetch_add(1, Ordering::SeqCst) + 1;
        *last_sink.lock().unwrap() = *transform;
        if verbose {
            println!(
                "  #{count}: rotation {:+.4} rad, scale {:.4}",
                transform.rotation, transform.scale_x
            );
        } else if count % 30 == 0 {
            print!(".");
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
    })?;

    let started = Instant::now();
    let total = Duration::from_secs_f64(args.duration);
    let mut lock_pending = args.lock_at;
    let mut unlock_pending = args.unlock_at;

    while started.elapsed() < total {
        let elapsed = started.elapsed().as_secs_f64();
        if lock_pending.is_some_and(|at| elapsed >= at) {
            println!("\n[{elapsed:.2}s] locking");
            engine.lock();
            lock_pending = None;
        }
        if unlock_pending.is_some_and(|at| elapsed >= at) {
            println!("\n[{elapsed:.2}s] unlocking");
            engine.unlock();
            unlock_pending = None;
        }
        thread::sleep(Duration::from_millis(10));
    }

    engine.stop();
    if !verbose {
        println!();
    }

    let final_transform = *last_transform.lock().unwrap();
    println!(
        "\nFinal transform: rotation {:+.4} rad, scale {:.4}",
        final_transform.rotation, final_transform.scale_x
    );

    let snapshot = engine.take_diagnostics();
    println!("Transforms emitted: {}", emitted.load(Ordering::SeqCst));
    println!("Diagnostics: {} angles recorded", snapshot.sample_count);
    if let Some(mean) = snapshot.mean_angle_degrees {
        println!("Mean displayed angle: {mean:.1} deg");
    }

    println!("Engine stopped successfully");
    Ok(())
}
