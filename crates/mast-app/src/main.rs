// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MAST harness: replays a rich-media script against a console host.
//
// Entry point. Initialises logging, loads the SDK config, builds an ad view
// over the console host, and runs each script step in order.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use kurbo::{Rect, Size};

use mast_core::{HostLayout, PlacementType};
use mast_host::traits::SurfaceHost;
use mast_view::{AdEvent, AdView};

use services::config_file::{load_config, persist_config};
use services::console_host::ConsoleHost;
use services::script::{Step, parse_rect, parse_script, parse_size};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Placement {
    Inline,
    Interstitial,
}

impl From<Placement> for PlacementType {
    fn from(p: Placement) -> Self {
        match p {
            Placement::Inline => PlacementType::Inline,
            Placement::Interstitial => PlacementType::Interstitial,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "mast-harness")]
#[command(about = "Replay rich-media ad scripts against a console host", long_about = None)]
#[command(version)]
struct Cli {
    /// Replay script, one step per line
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// SDK config file (JSON); defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective config to this path before running
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "inline")]
    placement: Placement,

    /// Device screen, WIDTHxHEIGHT
    #[arg(long, default_value = "480x800", value_parser = parse_size)]
    screen: Size,

    /// Hosting page, WIDTHxHEIGHT
    #[arg(long, default_value = "480x728", value_parser = parse_size)]
    page: Size,

    /// Ad container in page coordinates, x,y,width,height
    #[arg(long, default_value = "0,0,320,50", value_parser = parse_rect)]
    container: Rect,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(script = %cli.script.display(), "MAST harness starting");

    let config = load_config(cli.config.as_deref());
    if let Some(path) = &cli.save_config {
        if let Err(e) = persist_config(path, &config) {
            tracing::error!(error = %e, "could not write config");
            return ExitCode::FAILURE;
        }
    }

    let steps = match std::fs::read_to_string(&cli.script)
        .map_err(Into::into)
        .and_then(|text| parse_script(&text))
    {
        Ok(steps) => steps,
        Err(e) => {
            tracing::error!(error = %e, "could not read script");
            return ExitCode::FAILURE;
        }
    };

    let layout = HostLayout::new(cli.screen, cli.page, cli.container);
    let mut view = AdView::new(
        config,
        cli.placement.into(),
        ConsoleHost::new(layout),
        |event: AdEvent| println!("  app     {event:?}"),
    );

    for step in steps {
        println!("> {step:?}");
        run_step(&mut view, layout, step).await;
    }
    view.dispose();
    tracing::info!("script finished");
    ExitCode::SUCCESS
}

async fn run_step(view: &mut AdView<ConsoleHost>, base: HostLayout, step: Step) {
    match step {
        Step::Load(html) => {
            if let Err(e) = view.load_rich_media(&html) {
                tracing::warn!(error = %e, "load failed");
            }
        }
        Step::PageLoaded => view.on_page_loaded(),
        Step::Notify(raw) => view.on_script_notify(&raw),
        Step::SecondSurface(raw) => view.on_second_surface_notify(&raw),
        Step::Tap => view.on_close_tapped(),
        Step::Container(frame) => {
            let layout = view.host().layout();
            view.host_mut().set_layout(HostLayout {
                container: frame,
                default_frame: frame,
                ..layout
            });
            view.on_layout_changed();
        }
        Step::Rotate(rotation) => {
            let layout = view.host().layout();
            // Screen and page swap axes between portrait and landscape.
            let (screen, page) = if rotation.is_landscape() {
                (
                    Size::new(base.screen.height, base.screen.width),
                    Size::new(base.page.height, base.page.width),
                )
            } else {
                (base.screen, base.page)
            };
            if view.session().is_some_and(|s| s.bridge.accepts_rotation()) {
                view.host_mut()
                    .set_layout(HostLayout { screen, page, ..layout }.with_rotation(rotation));
            }
            view.on_orientation_changed(rotation);
        }
        Step::ShowInterstitial => {
            if let Err(e) = view.show_interstitial() {
                tracing::warn!(error = %e, "show failed");
            }
        }
        Step::CloseInterstitial => view.close_interstitial(),
        Step::Wait(duration) => {
            tokio::time::sleep(duration).await;
            let handled = view.pump();
            tracing::debug!(handled, "dispatcher drained");
        }
        Step::Dispose => view.dispose(),
    }
}
