use std::error::Error;
use std::path::PathBuf;

use chip8_core::constants::{DEFAULT_SPEED, MAX_SPEED};
use chip8_core::debug::Category;
use chip8_core::Quirks;
use clap::{Parser, ValueEnum};

mod keymap;
mod run;

/// Run a Chip-8 ROM
#[derive(Parser, Debug)]
#[command(name = "chip8", version, about)]
struct Cli {
    /// ROM file to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(
        long,
        default_value_t = DEFAULT_SPEED,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SPEED as i64)
    )]
    speed: u32,

    /// Window pixels per Chip-8 pixel
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// 8xy6/8xyE shift Vy into Vx instead of shifting Vx in place
    #[arg(long)]
    no_shift_quirk: bool,

    /// Fx55/Fx65 advance I past the registers they touch
    #[arg(long)]
    no_load_store_quirk: bool,

    /// Clip sprites at the screen edges instead of wrapping them
    #[arg(long)]
    no_wrap: bool,

    /// 8xy1/8xy2/8xy3 leave VF untouched
    #[arg(long)]
    no_logic_flag_reset: bool,

    /// Pause when execution reaches this hex address, e.g. 0x2A4
    #[arg(long = "break", value_name = "ADDR", value_parser = parse_address)]
    breakpoints: Vec<u16>,

    /// Pause after executing any instruction of this kind
    #[arg(long = "break-on", value_name = "CATEGORY", value_enum)]
    break_on: Vec<BreakOn>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum BreakOn {
    Jump,
    Call,
    Return,
    Skip,
    Draw,
    KeyWait,
    KeySkip,
}

impl From<BreakOn> for Category {
    fn from(break_on: BreakOn) -> Self {
        match break_on {
            BreakOn::Jump => Category::Jump,
            BreakOn::Call => Category::Call,
            BreakOn::Return => Category::Return,
            BreakOn::Skip => Category::Skip,
            BreakOn::Draw => Category::Draw,
            BreakOn::KeyWait => Category::KeyWait,
            BreakOn::KeySkip => Category::KeySkip,
        }
    }
}

impl Cli {
    fn quirks(&self) -> Quirks {
        Quirks {
            shift: !self.no_shift_quirk,
            load_store: !self.no_load_store_quirk,
            wrap: !self.no_wrap,
            logic_flag_reset: !self.no_logic_flag_reset,
        }
    }

    fn into_options(self) -> run::Options {
        run::Options {
            quirks: self.quirks(),
            break_on: self.break_on.iter().map(|&b| b.into()).collect(),
            rom: self.rom,
            speed: self.speed,
            scale: self.scale,
            breakpoints: self.breakpoints,
        }
    }
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("`{}` isn't a hex address: {}", s, e))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    run::run(cli.into_options())
}
