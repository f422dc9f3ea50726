use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};

use chip8_core::constants::TIMER_HZ;
use chip8_core::debug::{disassemble, Category};
use chip8_core::{Chip8, Hardware, Quirks, Step};
use chip8_display::{Display, Screen};
use log::{error, info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use crate::keymap::keymap;

/// Everything the host needs to know before starting a ROM
pub struct Options {
    pub rom: PathBuf,
    pub speed: u32,
    pub scale: u32,
    pub quirks: Quirks,
    pub breakpoints: Vec<u16>,
    pub break_on: Vec<Category>,
}

/// Run a ROM until the window is closed or the machine faults
///
/// Host controls:
/// - `Space` (held) runs without pacing
/// - `Backspace` restarts the ROM
/// - `Return` resumes after the debugger pauses
pub fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::new();
    chip8.set_quirks(options.quirks);
    for &pc in &options.breakpoints {
        if !chip8.debugger_mut().set_breakpoint(pc) {
            warn!("ignoring breakpoint at {:04X}, not an instruction in program memory", pc);
        }
    }
    for &category in &options.break_on {
        chip8.debugger_mut().arm(category);
    }

    let file = File::open(&options.rom)?;
    let mut reader = BufReader::new(file);
    chip8.load_rom(&mut reader)?;

    let sdl_context = sdl2::init()?;
    let mut display = Display::new(&sdl_context, options.scale)?;
    let mut events = sdl_context.event_pump()?;
    let mut screen = Screen::new();

    let cycle_time = Duration::from_secs(1) / options.speed;
    let timer_time = Duration::from_secs(1) / TIMER_HZ;
    let mut last_timer_tick = Instant::now();
    let mut fast_forward = false;
    let mut warned_incompatible = false;
    let mut buzzing = false;

    'running: loop {
        let cycle_start = Instant::now();

        if let Some(frame) = screen.take_frame() {
            display.render(&frame)?;
        }

        chip8.clear_last_key();
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match (key, keymap(key)) {
                    (_, Some(value)) => chip8.key_press(value)?,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Backspace, _) => {
                        chip8.reset()?;
                        screen.clear_screen();
                    }
                    (Keycode::Return, _) => chip8.resume(),
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(value)) => chip8.key_release(value)?,
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // timers hold still while the debugger has the machine paused
        if chip8.is_paused() {
            last_timer_tick = cycle_start;
        }
        while cycle_start.duration_since(last_timer_tick) >= timer_time {
            chip8.advance_timers();
            last_timer_tick += timer_time;
        }

        let was_paused = chip8.is_paused();
        match chip8.advance_cpu(&mut screen) {
            Ok(Some(Step::Unrecognized(op))) if !warned_incompatible => {
                warn!("{:04X} isn't a Chip-8 instruction, the ROM may be incompatible", op);
                warned_incompatible = true;
            }
            Ok(_) => {}
            Err(e) => {
                error!("{}\n{}", e, chip8.state());
                return Err(e.into());
            }
        }
        if chip8.is_paused() && !was_paused {
            let state = chip8.state();
            let reason = if chip8.debugger().has_breakpoint(state.pc) {
                "breakpoint"
            } else {
                "break-on"
            };
            info!(
                "paused ({}) before {}\n{}",
                reason,
                disassemble(state.pc, state, &chip8.quirks()),
                state
            );
        }

        let sounding = chip8.state().sound_active();
        if sounding != buzzing {
            info!("buzzer {}", if sounding { "on" } else { "off" });
            buzzing = sounding;
        }

        let elapsed = cycle_start.elapsed();
        if !fast_forward && elapsed < cycle_time {
            sleep(cycle_time - elapsed);
        }
    }

    Ok(())
}
