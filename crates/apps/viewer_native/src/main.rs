use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use field::{
    DecorFeature, FieldCache, FieldCacheError, FieldCacheKey, InMemoryFieldCache, JsonDirFieldCache,
};
use foundation::math::Viewport;
use globe::{GlobeConfig, GlobeScene, SceneEvent};
use render::{DrawCommand, RecordingSurface};
use runtime::{IntervalScheduler, ManualScheduler, TickScheduler};
use scene::{OutlineSet, OutlineState, SceneFeature, StationNetwork, TravelEvent};
use spectral::{RasterImage, RequestId, SpectralWorker, WorkerConfig, WorkerResponse, cover_crop};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Largest side handed to the spectrum worker.
const SPECTRUM_MAX_SIDE: u32 = 512;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless globe + spectrum viewer")]
struct Args {
    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 240)]
    frames: u64,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Persist generated backdrops here (one JSON file per size bucket)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Travel events JSON (array); the built-in station network is used otherwise
    #[arg(long)]
    events: Option<PathBuf>,

    /// GeoJSON FeatureCollection with land/border outlines
    #[arg(long)]
    outlines: Option<PathBuf>,

    /// Side of the synthetic portrait fed to the spectrum worker
    #[arg(long, default_value_t = 256)]
    spectrum_size: u32,

    /// Write the spectrum as a binary PPM
    #[arg(long)]
    spectrum_out: Option<PathBuf>,

    /// Seed for the decorative backdrop
    #[arg(long)]
    seed: Option<u64>,

    /// Pace frames at ~60 Hz instead of stepping as fast as possible
    #[arg(long)]
    realtime: bool,
}

/// Backdrop store picked at startup.
enum HostCache {
    Memory(InMemoryFieldCache),
    Dir(JsonDirFieldCache),
}

impl FieldCache for HostCache {
    fn get(&self, key: &FieldCacheKey) -> Result<Option<Vec<DecorFeature>>, FieldCacheError> {
        match self {
            HostCache::Memory(c) => c.get(key),
            HostCache::Dir(c) => c.get(key),
        }
    }

    fn set(&mut self, key: &FieldCacheKey, features: &[DecorFeature]) -> Result<(), FieldCacheError> {
        match self {
            HostCache::Memory(c) => c.set(key, features),
            HostCache::Dir(c) => c.set(key, features),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GlobeConfig::load(path).map_err(|e| e.to_string())?,
        None => GlobeConfig::default(),
    };
    if args.seed.is_some() {
        config.field.seed = args.seed;
    }

    let cache = match &args.cache_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| format!("{}: {e}", dir.display()))?;
            HostCache::Dir(JsonDirFieldCache::new(dir))
        }
        None => HostCache::Memory(InMemoryFieldCache::new()),
    };

    let network = match &args.events {
        Some(path) => StationNetwork::new(load_events(path)?, Vec::new()),
        None => StationNetwork::eht(),
    };
    let outlines = match &args.outlines {
        Some(path) => OutlineState::from_load(
            fs::read_to_string(path)
                .map_err(|e| scene::OutlineError::Parse(format!("{}: {e}", path.display())))
                .and_then(|text| OutlineSet::from_geojson_str(&text)),
        ),
        None => OutlineState::NotLoaded,
    };

    let viewport = Viewport::new(args.width, args.height);
    let mut worker = SpectralWorker::spawn(WorkerConfig::default());
    let portrait = synthetic_portrait(args.spectrum_size).fit_within(SPECTRUM_MAX_SIDE);
    worker
        .submit(RequestId::new("portrait"), portrait.clone())
        .map_err(|e| e.to_string())?;

    let stats = if args.realtime {
        let scene = GlobeScene::with_network(config, network, IntervalScheduler::sixty_hz(), cache);
        run(scene, outlines, viewport, args.frames, |_| {})
    } else {
        let scene = GlobeScene::with_network(config, network, ManualScheduler::new(0.0), cache);
        run(scene, outlines, viewport, args.frames, |s| s.advance(16.0))
    };
    info!(
        frames = stats.frames,
        commands = stats.commands,
        selections = stats.selections,
        "scene finished"
    );

    let mut spectrum = None;
    for response in worker.poll() {
        spectrum = Some(response);
    }
    let response = match spectrum {
        Some(r) => r,
        None => worker
            .recv_timeout(Duration::from_secs(30))
            .map_err(|e| e.to_string())?,
    };
    match response {
        WorkerResponse::Result { result, id } => {
            let crop = cover_crop(
                result.width as f64,
                result.height as f64,
                portrait.width as f64,
                portrait.height as f64,
            );
            info!(%id, size = result.width, ?crop, "spectrum ready");
            if let Some(path) = &args.spectrum_out {
                write_ppm(path, &result).map_err(|e| format!("{}: {e}", path.display()))?;
                info!(path = %path.display(), "spectrum written");
            }
        }
        WorkerResponse::Error { error, id } => {
            warn!(%id, "spectrum failed: {error}");
        }
    }
    Ok(())
}

struct RunStats {
    frames: u64,
    commands: usize,
    selections: usize,
}

/// Mounts the scene and steps it for `frames` ticks. Halfway through, a click
/// lands on the first visible feature and is dismissed a few frames later.
fn run<S: TickScheduler>(
    mut scene: GlobeScene<S, HostCache>,
    outlines: OutlineState,
    viewport: Viewport,
    frames: u64,
    mut before_tick: impl FnMut(&mut S),
) -> RunStats {
    let selections = std::rc::Rc::new(std::cell::Cell::new(0usize));
    let counter = std::rc::Rc::clone(&selections);
    scene.add_listener(move |event| match event {
        SceneEvent::Selected(feature) => {
            counter.set(counter.get() + 1);
            info!(id = %feature.id, label = %feature.label, "selected");
        }
        SceneEvent::Dismissed => info!("selection dismissed"),
    });
    scene.set_outlines(outlines);
    scene.mount(viewport);

    let mut surface = RecordingSurface::new();
    let mut stats = RunStats {
        frames: 0,
        commands: 0,
        selections: 0,
    };
    for i in 0..frames {
        before_tick(scene.scheduler_mut());
        if scene.pump(&mut surface) {
            stats.frames += 1;
        }
        stats.commands += count_drawn(&mut surface);

        if i == frames / 2 {
            click_first_visible(&mut scene);
        }
        if i == frames / 2 + 10 {
            scene.key_down("Escape");
        }
    }
    scene.unmount();
    stats.selections = selections.get();
    stats
}

fn click_first_visible<S: TickScheduler>(scene: &mut GlobeScene<S, HostCache>) {
    let Some(at) = scene.points().iter().find(|p| p.front).map(|p| p.screen) else {
        return;
    };
    scene.pointer_move(at);
    scene.pointer_down(at);
    scene.pointer_up(at);
}

fn count_drawn(surface: &mut RecordingSurface) -> usize {
    surface
        .take()
        .iter()
        .filter(|c| !matches!(c, DrawCommand::SetTransform(_)))
        .count()
}

fn load_events(path: &Path) -> Result<Vec<SceneFeature>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let events: Vec<TravelEvent> =
        serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(events.into_iter().map(TravelEvent::into_feature).collect())
}

/// Concentric rings with a soft vignette; stands in for a decoded photo.
fn synthetic_portrait(side: u32) -> RasterImage {
    let side = side.max(1);
    let c = side as f64 / 2.0;
    RasterImage::from_fn(side, side, |x, y| {
        let r = (x as f64 - c).hypot(y as f64 - c);
        let ring = ((r / 6.0).sin() * 0.5 + 0.5) * (1.0 - (r / c).min(1.0));
        let v = (ring * 255.0).round() as u8;
        [v, v, v, 255]
    })
}

fn write_ppm(path: &Path, image: &RasterImage) -> std::io::Result<()> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", image.width, image.height)?;
    for px in image.pixels.chunks_exact(4) {
        out.write_all(&px[..3])?;
    }
    out.flush()
}
