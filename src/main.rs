use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tour_overlay::geometry::Monitor;
use tour_overlay::logging;
use tour_overlay::service::wire::{parse_monitor_size, Driver};
use tour_overlay::service::HighlightService;
use tour_overlay::session::HeadlessSurface;
use tour_overlay::settings::OverlaySettings;
use tour_overlay::shell::{ShellEnvironment, StaticShell};

#[derive(Parser, Debug)]
#[command(
    name = "tour-overlayd",
    version,
    about = "Headless tour highlight overlay driven by JSON lines on stdin"
)]
struct Cli {
    /// Settings file. Defaults to the per-user config location.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Scene file describing monitors, widgets and app icons.
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Primary monitor size when no scene is given, e.g. 1920x1080.
    #[arg(long, value_name = "WxH")]
    monitor: Option<String>,
    #[arg(long)]
    debug: bool,
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().or_else(OverlaySettings::default_path);
    let settings = match settings_path.as_deref() {
        Some(path) => OverlaySettings::load(path)?,
        None => OverlaySettings::default(),
    };

    let debug = cli.debug || settings.debug_logging;
    logging::init(debug, cli.log_file.clone().or_else(|| settings.log_file.clone()));
    tracing::info!(settings = ?settings_path, "starting tour-overlayd");

    let mut shell = match cli.scene.as_deref() {
        Some(path) => StaticShell::load(path)?,
        None => StaticShell::default(),
    };
    if let Some(spec) = cli.monitor.as_deref() {
        let (width, height) = parse_monitor_size(spec).context("invalid --monitor")?;
        let primary = shell.primary;
        if let Some(monitor) = shell.monitors.get_mut(primary) {
            monitor.width = width;
            monitor.height = height;
        } else {
            shell.monitors = vec![Monitor::new(0.0, 0.0, width, height)];
        }
    }

    let surface = HeadlessSurface::new(shell.primary_monitor());
    if let Some(root) = shell.widgets.as_ref() {
        for (name, rect) in root.flatten() {
            surface.add_host_widget(name, rect);
        }
    }
    for (desktop_id, rect) in &shell.app_icons {
        surface.add_host_widget(desktop_id.clone(), *rect);
    }

    let service = HighlightService::new(Box::new(surface.clone()), shell, settings);
    let mut driver = Driver::new(service, surface);
    driver.run(io::stdin().lock(), io::stdout().lock())?;
    tracing::info!("stdin closed, exiting");
    Ok(())
}
