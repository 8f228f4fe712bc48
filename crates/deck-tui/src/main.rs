mod action;
mod app;
mod app_state;
mod component;
mod components;
mod idle;
mod launcher;
mod sounds;
mod theme;
mod widgets;

use std::sync::Arc;

use deck_proto::repository::{load_legacy_props, load_presets, JsonChannelFile};
use deck_proto::Deck;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = deck_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = deck_proto::platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("chdeck log: {}", log_path.display());

    tracing::info!("chdeck starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = deck_proto::config::Config::load().unwrap_or_default();

    // ── Channels ─────────────────────────────────────────────────────────────
    let repository = JsonChannelFile::new(&config.paths.channels_file);
    let legacy = load_legacy_props(&config.paths.legacy_file).unwrap_or_else(|e| {
        tracing::warn!(
            "ignoring legacy props {}: {:#}",
            config.paths.legacy_file.display(),
            e
        );
        Default::default()
    });
    let presets = load_presets(&config.paths.presets_dir);
    let deck = Deck::load(&config, Box::new(repository), legacy)?.with_presets(presets);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let sounds = sounds::cues_for(config.channels.click_sound.clone());
    let app = app::App::new(
        deck,
        &config.channels,
        Arc::new(launcher::SystemLauncher),
        sounds,
    );
    app.run().await?;

    Ok(())
}
