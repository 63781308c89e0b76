// filepath: src/main.rs

mod app;
mod pointer;
mod wayland;

use app::{AppData, ShowcaseParts};
use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use hypr_showcase::config::ShowcaseConfig;
use hypr_showcase::text::FontText;
use hypr_showcase::{Callbacks, FileRegistry};
use log::{info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::wlr_layer::{Layer, LayerShell},
    shm::{slot::SlotPool, Shm},
};
use std::path::PathBuf;
use std::time::Duration;
use wayland_client::{globals::registry_queue_init, Connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting hypr-showcase");

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ShowcaseConfig::get_config_path);
    let config = ShowcaseConfig::load_from_file(&config_path)?;
    info!("Configuration loaded from {}", config_path.display());

    let mut showcase = config.build_showcase()?;
    showcase.set_observer(
        Callbacks::new()
            .on_shown(|| info!("Showcase presented"))
            .on_dismissed(|| info!("Showcase dismissed by tap")),
    );

    let style = showcase.style();
    let mut text = FontText::load([&style.title_font, &style.details_font]).unwrap_or_else(|e| {
        warn!("{e}; using system fonts instead");
        FontText::new()
    });
    if let Err(e) = text.load_system_fonts() {
        warn!("{e}; text without a configured font is drawn as boxes");
    }

    let single_shot = FileRegistry::open_or_empty(FileRegistry::default_path());
    info!("Single-shot registry at {}", single_shot.path().display());

    let conn = Connection::connect_to_env()?;
    let (globals, mut event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let compositor = CompositorState::bind(&globals, &qh)?;
    let layer_shell = LayerShell::bind(&globals, &qh)?;
    let shm = Shm::bind(&globals, &qh)?;
    let seat_state = SeatState::new(&globals, &qh);

    // Grows on demand once the output size is known
    let pool = SlotPool::new(1920 * 1080 * 4, &shm)?;

    let surface = compositor.create_surface(&qh);
    let layer_surface =
        layer_shell.create_layer_surface(&qh, surface, Layer::Overlay, Some("hypr-showcase"), None);

    let mut app_data = AppData::new(
        RegistryState::new(&globals),
        OutputState::new(&globals, &qh),
        seat_state,
        compositor,
        shm,
        layer_surface,
        pool,
        ShowcaseParts {
            showcase,
            scene: config.scene.clone(),
            single_shot,
            text,
        },
    );

    info!("Performing initial round-trip");
    event_queue.roundtrip(&mut app_data)?;

    let mut event_loop: EventLoop<AppData> = EventLoop::try_new()?;
    WaylandSource::new(conn.clone(), event_queue)
        .insert(event_loop.handle())
        .map_err(|e| e.error)?;

    info!("Entering event loop");
    while !app_data.exit {
        event_loop.dispatch(Duration::from_millis(100), &mut app_data)?;
    }

    conn.flush()?;
    info!("Exiting");
    Ok(())
}
