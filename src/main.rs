//! Terminal demo for the seamless carousel.
//!
//! Drives one carousel from stdin commands and logs every state change.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use seamless_carousel::config::Configuration;
use seamless_carousel::events::NavOutcome;
use seamless_carousel::tasks::driver;
use seamless_carousel::view::{IndicatorRow, NextButton, PrevButton, SlideTrack, render_bullets};

#[derive(Debug, Parser)]
#[command(
    name = "carousel-demo",
    version,
    about = "Drive a looping carousel from the terminal"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Enable auto-advance regardless of the config
    #[arg(long)]
    auto: bool,

    /// Override the auto-advance interval (e.g. 1500ms, 2s)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Previous,
    Next,
    Goto(usize),
    Auto(bool),
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let input = match words.next()? {
        "p" | "prev" | "previous" => Input::Previous,
        "n" | "next" => Input::Next,
        "g" | "goto" => Input::Goto(words.next()?.parse().ok()?),
        "auto" => match words.next()? {
            "on" => Input::Auto(true),
            "off" => Input::Auto(false),
            _ => return None,
        },
        "q" | "quit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("seamless_carousel={level}").parse()?)
        .add_directive(format!("carousel_demo={level}").parse()?);
    fmt().with_env_filter(filter).with_target(false).compact().init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        auto,
        interval,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let mut cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?;
    if auto {
        cfg.auto = true;
    }
    if let Some(interval) = interval {
        cfg.interval = interval;
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    info!(
        slides = cfg.slides.len(),
        slides_to_show = cfg.slides_to_show,
        speed = %humantime::format_duration(cfg.speed),
        auto = cfg.auto,
        interval = %humantime::format_duration(cfg.interval),
        "loaded configuration from {}",
        config.display()
    );
    if cfg.slides.is_empty() {
        warn!("no slides configured; carousel is inert");
    }

    let cancel = CancellationToken::new();
    let (handle, task) = driver::spawn(cfg.slides.len(), cfg.carousel_options(), cancel.clone());

    let track = SlideTrack::new(handle.clone(), cfg.slides.clone());
    let prev = PrevButton::new(handle.clone());
    let next = NextButton::new(handle.clone());
    let indicators = IndicatorRow::new(handle.clone());

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    // Bridge blocking stdin -> async channel; EOF closes the channel.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });

    info!("commands: n | p | g <index> | auto on|off | q");
    let mut state = handle.watch();
    render(&track, &indicators);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            maybe_line = line_rx.recv() => {
                let Some(line) = maybe_line else {
                    info!("stdin closed; initiating shutdown");
                    break;
                };
                let outcome = match parse_input(&line) {
                    Some(Input::Previous) => prev.click().await.map(Some),
                    Some(Input::Next) => next.click().await.map(Some),
                    Some(Input::Goto(index)) => indicators.select(index).await.map(Some),
                    Some(Input::Auto(enabled)) => handle.set_auto(enabled).await.map(|_| None),
                    Some(Input::Quit) => break,
                    None => {
                        warn!(input = line.trim(), "unrecognised command");
                        continue;
                    }
                };
                match outcome {
                    Ok(Some(NavOutcome::Ignored(reason))) => info!(?reason, "request ignored"),
                    Ok(_) => {}
                    Err(err) => {
                        warn!("carousel unavailable: {err}");
                        break;
                    }
                }
            }

            changed = state.changed() => {
                if changed.is_err() {
                    debug!("carousel state channel closed");
                    break;
                }
                render(&track, &indicators);
            }
        }
    }

    cancel.cancel();
    match task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("carousel task error: {e:?}"),
        Err(e) => tracing::error!("join error: {e}"),
    }
    Ok(())
}

fn render(track: &SlideTrack<String>, indicators: &IndicatorRow) {
    let frame = track.frame();
    let visible = frame
        .visible()
        .map(|entry| entry.page.slides().join(", "))
        .unwrap_or_default();
    info!(
        offset = %format!("{}%", frame.offset_percent),
        transition = %frame.transition,
        bullets = %render_bullets(&indicators.bullets()),
        "showing [{visible}]"
    );
}
