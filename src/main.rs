// What you SEE now:
// • Live camera (mirrored) with the simulated hand drawn on top.
// • Hold Left Mouse and move: your pointer is the index fingertip, a neon
//   trail follows it.
// • Release the button: that's the pinch. The stroke is classified and the
//   spell is printed; its 28×28 sample shows in the top-left corner.
// • C clears the stroke. ESC quits.
// • No camera, or an --artifacts file that won't load? Keys 1–4 cast / \ | O instead.
//
// Run: cargo run --features live -- --artifacts path/to/projection.json

use std::path::PathBuf;

use clap::Parser;
use spellcaster::camera::CameraCapture;
use spellcaster::window::Drawer;
use spellcaster::{
    CentroidClassifier, EngineConfig, Error, PointerDetector, PointerState, ProjectionArtifacts,
    SharedPointer, SpellEngine,
};

#[derive(Parser, Debug)]
#[command(name = "spellcaster", about = "Draw spells in the air, pinch to cast")]
struct Cli {
    /// Camera device index
    #[arg(long, default_value_t = 0)]
    camera: u32,
    /// Requested frame width
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Requested frame height
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Engine config (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Projection artifacts (JSON: mean, std, components, centroids).
    /// Required; if it fails to load, the demo runs keyboard-only.
    #[arg(long)]
    artifacts: PathBuf,
}

/// Everything that can refuse to start lives here, so main can fall back.
fn build_engine(cli: &Cli, cfg: &EngineConfig, pointer: SharedPointer) -> Result<SpellEngine, Error> {
    let artifacts = ProjectionArtifacts::from_json_file(&cli.artifacts)?;
    let classifier = CentroidClassifier::from_artifacts(&artifacts)?;
    let camera = CameraCapture::new(cli.camera, cli.width, cli.height)?;
    let detector = PointerDetector::new(pointer, cfg.pointer_joint, cfg.pinch_joint);
    SpellEngine::spawn(cfg, camera, detector, classifier, &artifacts)
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    /* --- Engine (camera + artifacts + classifier) ---
       Visual: if this fails the window still opens, black, keyboard only. */
    let pointer = PointerDetector::shared();
    let mut engine = match build_engine(&cli, &cfg, pointer.clone()) {
        Ok(engine) => Some(engine),
        Err(e) => {
            log::warn!("vision input unavailable ({e}); keyboard fallback: 1 /  2 \\  3 |  4 O");
            None
        }
    };

    let (w, h) = engine
        .as_ref()
        .map_or((cli.width, cli.height), SpellEngine::resolution);
    let mut drawer = Drawer::new("Spellcaster", w as usize, h as usize)?;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Hand the mouse to the pointer detector (runs on the engine thread). */
        *pointer.lock() = PointerState {
            position: drawer.pointer(),
            pressed: drawer.left_mouse_down(),
        };

        /* 2) Inputs: C clears, vision spells first, keys as a backup. */
        if drawer.c_pressed_once() {
            if let Some(engine) = &engine {
                engine.clear();
            }
        }
        let spell = engine
            .as_ref()
            .and_then(SpellEngine::get_gesture)
            .or_else(|| drawer.spell_key_once());
        if let Some(token) = spell {
            println!("cast {token} ({})", token.spell_name());
        }

        /* 3) Present: preview frame + debug sample. */
        let frame = engine.as_ref().and_then(SpellEngine::latest_frame);
        let sample = engine
            .as_ref()
            .and_then(SpellEngine::last_sample)
            .map(|s| s.to_image());
        drawer.present(frame.as_ref(), sample.as_ref())?;

        /* 4) A worker that died on its own leaves us in keyboard mode. */
        if engine.as_ref().is_some_and(|e| !e.is_running()) {
            log::warn!("vision loop ended; keyboard fallback only");
            engine = None;
        }
    }

    if let Some(mut engine) = engine {
        engine.stop();
    }
    Ok(())
}
