#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use qrcraft_business::SessionConfig;
use qrcraft_ui::state::State;

#[global_allocator]
static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> eframe::Result {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let config = SessionConfig::from_env().unwrap_or_else(|e| {
        log::warn!("Ignoring invalid configuration: {e}");
        SessionConfig::default()
    });
    log::info!("Starting with {config:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("qrcraft-worker")
        .enable_all()
        .build()
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("QRCraft")
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([520.0, 420.0]),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "QRCraft",
        native_options,
        Box::new(move |_cc| {
            let state = State::builder().runtime(handle).config(config).build();
            Ok(Box::new(qrcraft_ui::QrCraftApp::new(state)))
        }),
    )
}
