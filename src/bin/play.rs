//! Playable window: arrows move/turn, C crouches, Space restarts after
//! being spotted, Escape quits.
//!
//! ```bash
//! YAMAZE_LOG=info cargo run --release -- --assets assets level-1.png
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use yamaze_rs::{
    assets::{load_enemy_sprite, load_level},
    renderer::{Renderer, SCREEN_H, SCREEN_W, Software},
    sim::{InputCmd, SIM_FPS, Simulation, Ticker},
    world::TextureBank,
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Directory holding the level and `enemy-*.png` sprites
    #[arg(long, value_name = "DIR", default_value = "assets")]
    assets: PathBuf,

    /// Level file inside the asset directory (`.png` raster or ASCII text)
    #[arg(value_name = "LEVEL", default_value = "level-1.png")]
    level: PathBuf,

    /// Hide the top-right minimap overlay
    #[arg(long)]
    no_minimap: bool,
}

/// Sample the keyboard into one command for this frame's tics.
fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::Up) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::Left) {
        cmd.turn += 1.0;
    }
    if win.is_key_down(Key::Right) {
        cmd.turn -= 1.0;
    }
    cmd.crouch = win.is_key_down(Key::C);
    cmd.restart = win.is_key_pressed(Key::Space, KeyRepeat::No); // edge-trigger
    cmd
}

fn title(sim: &Simulation) -> String {
    if sim.is_over() {
        return "yamaze - SPOTTED! press Space to restart, Esc to quit".to_string();
    }
    let p = sim.player();
    let stance = if p.crouching { "Crouching" } else { "Standing" };
    format!(
        "yamaze - {stance} (eye offset {:.2}) - arrows move, C crouch, Esc quit",
        p.camera.eye_offset
    )
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("YAMAZE_LOG");
    let opts = Opts::parse();

    // ─────────── load level & sprites ───────
    let level_path = opts.assets.join(&opts.level);
    let level = load_level(&level_path)
        .with_context(|| format!("loading level {}", level_path.display()))?;

    let mut bank = TextureBank::default_with_checker();
    let enemy_sprite = load_enemy_sprite(&opts.assets, &mut bank)
        .with_context(|| format!("loading sprites from {}", opts.assets.display()))?;

    let mut sim = Simulation::new(&level, &enemy_sprite);
    let mut renderer = Software::new(!opts.no_minimap);

    let mut win = Window::new(&title(&sim), SCREEN_W, SCREEN_H, WindowOptions::default())?;
    win.set_target_fps(SIM_FPS as usize);
    log::info!("window opened at {SCREEN_W}×{SCREEN_H}");

    let mut ticker = Ticker::new();
    let mut last_title = String::new();

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let cmd = read_input(&win);

        if sim.is_over() && cmd.restart {
            log::debug!("restarting round");
            sim = Simulation::new(&level, &enemy_sprite);
            ticker = Ticker::new();
        }
        for _ in 0..ticker.due() {
            sim.tick(&cmd);
        }

        let t0 = Instant::now();
        renderer.begin_frame(SCREEN_W, SCREEN_H);
        renderer.draw_scene(&sim, &bank);
        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        let t = title(&sim);
        if t != last_title {
            win.set_title(&t);
            last_title = t;
        }

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::info!("avg render: {avg_ms:.2} ms  ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
