mod logging;
mod script;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use embassy_time::Instant;
use embedded_graphics::prelude::{Point, Size};
use touchcal::{
    scene::{Framebuffer, Scene},
    CalibrationHost, CalibrationWizard, WizardConfig, WizardDispatch, WizardEvent, WizardObserver,
};

use script::ScriptTap;

// Long enough for any target animation to land before a snapshot.
const SETTLE_MS: u64 = 1_000;

#[derive(Debug, Parser)]
#[command(name = "cal_replay")]
#[command(about = "Replay scripted taps through the touchscreen calibration wizard")]
struct Cli {
    /// Tap script, one `tap,ms,x,y[,raw_x,raw_y]` record per line.
    script: PathBuf,
    /// Fail unless the printed event lines match this file.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Write the final frame as a grayscale PNG.
    #[arg(long)]
    png: Option<PathBuf>,
    #[arg(long, default_value_t = 480)]
    width: u32,
    #[arg(long, default_value_t = 320)]
    height: u32,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Recorder {
    events: Vec<WizardEvent>,
}

impl WizardObserver for Recorder {
    fn notify(&mut self, event: WizardEvent) {
        self.events.push(event);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let source = fs::read_to_string(&cli.script)
        .with_context(|| format!("read {}", cli.script.display()))?;
    let taps = script::parse_taps(&source)
        .with_context(|| format!("parse {}", cli.script.display()))?;
    if cli.width == 0 || cli.height == 0 {
        bail!("width/height must be > 0");
    }

    let mut scene = Scene::new(Size::new(cli.width, cli.height));
    let (wizard, last_ms) = replay(&mut scene, &taps)?;

    let lines: Vec<String> = wizard.observer().events.iter().map(event_line).collect();
    for line in &lines {
        println!("{line}");
    }

    if let Some(path) = &cli.png {
        scene.tick(Instant::from_millis(last_ms.saturating_add(SETTLE_MS)));
        write_png(&scene, path)?;
        log::info!("wrote {}", path.display());
    }

    if let Some(path) = &cli.expect {
        let expected = fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let expected = script::parse_expected(&expected);
        if lines != expected {
            eprintln!("expected: {}", expected.join(" | "));
            eprintln!("actual:   {}", lines.join(" | "));
            bail!("event sequence mismatch");
        }
    }

    Ok(())
}

fn replay(
    scene: &mut Scene,
    taps: &[ScriptTap],
) -> Result<(CalibrationWizard<Scene, Recorder>, u64)> {
    let mut wizard = CalibrationWizard::start(scene, WizardConfig::default(), Recorder::default())
        .context("start calibration")?;

    let mut last_ms = 0;
    for tap in taps {
        last_ms = tap.ms;
        scene.tick(Instant::from_millis(tap.ms));

        let hit = scene.hit_test(tap.screen);
        if hit.is_none() || hit != wizard.hit_surface() {
            log::warn!(
                "tap at {}ms ({}, {}) reached no calibration surface",
                tap.ms,
                tap.screen.x,
                tap.screen.y
            );
            continue;
        }

        let raw = tap.raw;
        let mut input = || raw;
        let dispatch = wizard
            .on_tap(scene, &mut input)
            .with_context(|| format!("tap at {}ms", tap.ms))?;
        log::debug!("tap at {}ms: {:?}, now {:?}", tap.ms, dispatch, wizard.state());
        if dispatch == WizardDispatch::Finished {
            log::info!("calibration finished at {}ms", tap.ms);
        }
    }

    if wizard.is_active() {
        log::warn!("script ended in {:?}", wizard.state());
    }
    Ok((wizard, last_ms))
}

fn event_line(event: &WizardEvent) -> String {
    match event {
        WizardEvent::Started => "started".to_owned(),
        WizardEvent::PointCaptured { corner, point } => {
            format!("point,{},{},{}", corner.label(), point.x, point.y)
        }
        WizardEvent::AwaitingExit => "awaiting-exit".to_owned(),
        WizardEvent::Finished { .. } => "finished".to_owned(),
    }
}

fn write_png(scene: &Scene, path: &Path) -> Result<()> {
    let size = scene.display_size();
    let mut bits = vec![0u8; Framebuffer::buffer_len(size)];
    let mut frame = Framebuffer::new(size, &mut bits).context("frame buffer")?;
    scene.draw(&mut frame);

    let mut luma = Vec::with_capacity((size.width * size.height) as usize);
    for y in 0..size.height as i32 {
        for x in 0..size.width as i32 {
            luma.push(if frame.pixel(Point::new(x, y)) { 0 } else { 255 });
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    image::save_buffer(path, &luma, size.width, size.height, image::ColorType::L8)
        .with_context(|| format!("save {}", path.display()))
}
