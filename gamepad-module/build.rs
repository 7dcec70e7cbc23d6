//! Build script for gamepad-module
//!
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` in OUT_DIR with the validated values

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use gamepad_core::config::{BoardConfig, GpioConfig, IrqConfig};
use gamepad_hal_efm32gg::Port;
use serde::Deserialize;

#[path = "build/report.rs"]
mod report;

/// Layout of board.toml
#[derive(Deserialize)]
struct BoardFile {
    device: DeviceSection,
    #[serde(default)]
    gpio: GpioConfig,
    #[serde(default)]
    irq: IrqConfig,
}

#[derive(Deserialize)]
struct DeviceSection {
    name: String,
    port: String,
}

fn main() {
    println!("cargo:rerun-if-changed=board.toml");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build/report.rs");

    let board = load_board(Path::new("board.toml"));
    let port = validate(&board);
    write_config(&board, port);
}

/// Abort the build with a framed report
fn fail(title: &str, lines: &[String]) -> ! {
    panic!("{}", report::frame(title, lines));
}

/// Read and parse board.toml
fn load_board(path: &Path) -> BoardFile {
    if !path.exists() {
        fail(
            "board.toml not found!",
            &[
                "The driver requires a board.toml configuration file.".to_string(),
                "Please create one in the gamepad-module directory.".to_string(),
            ],
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[format!("Error: {}", e)]),
    };

    match toml::from_str(&content) {
        Ok(board) => board,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid board.toml", &lines)
        }
    }
}

/// Parse the `[device] port` letter
fn parse_port(text: &str) -> Option<Port> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Port::from_letter(c),
        _ => None,
    }
}

/// Check every section, collecting all errors before failing
fn validate(board: &BoardFile) -> Port {
    let mut errors = Vec::new();

    if board.device.name.is_empty() {
        errors.push("[device] name cannot be empty".to_string());
    }
    if !board.device.name.is_ascii() {
        errors.push("[device] name must be ASCII".to_string());
    }

    let port = parse_port(&board.device.port);
    if port.is_none() {
        errors.push(format!(
            "[device] port must be A-F, got '{}'",
            board.device.port
        ));
    }

    let config = BoardConfig {
        gpio: board.gpio,
        irq: board.irq,
    };
    if let Err(e) = config.validate() {
        errors.push(format!("[gpio]/[irq] {:?}", e));
    }

    // Every enabled line must select the button port
    if let Some(port) = port {
        for pin in 0..8 {
            if board.gpio.interrupt_enable & (1 << pin) == 0 {
                continue;
            }
            let field = (board.gpio.exti_pin_select >> (pin * 4)) & 0xF;
            if field != port.exti_select() {
                let selected = match Port::from_exti_select(field) {
                    Some(other) => format!("{:?}", other),
                    None => format!("{:#x}", field),
                };
                errors.push(format!(
                    "[gpio] exti_pin_select line {} selects port {}, not {:?}",
                    pin, selected, port
                ));
            }
        }
    }

    match port {
        Some(port) if errors.is_empty() => port,
        _ => {
            let lines: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
            fail("Invalid board configuration", &lines)
        }
    }
}

/// Write the validated board as Rust constants
fn write_config(board: &BoardFile, port: Port) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let gpio = &board.gpio;
    let irq = &board.irq;

    let mut out = String::new();
    writeln!(out, "// Generated by build.rs from board.toml").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// Name used for every kernel registration").unwrap();
    writeln!(out, "pub const DEVICE_NAME: &str = {:?};", board.device.name).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// GPIO port the buttons are wired to").unwrap();
    writeln!(out, "pub const BUTTON_PORT: Port = Port::{:?};", port).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// Register values and interrupt numbers for this board").unwrap();
    writeln!(out, "pub const BOARD_CONFIG: BoardConfig = BoardConfig {{").unwrap();
    writeln!(out, "    gpio: GpioConfig {{").unwrap();
    writeln!(out, "        port_mode: {:#010x},", gpio.port_mode).unwrap();
    writeln!(out, "        port_output: {:#010x},", gpio.port_output).unwrap();
    writeln!(out, "        exti_pin_select: {:#010x},", gpio.exti_pin_select).unwrap();
    writeln!(out, "        exti_rising: {:#010x},", gpio.exti_rising).unwrap();
    writeln!(out, "        exti_falling: {:#010x},", gpio.exti_falling).unwrap();
    writeln!(out, "        interrupt_enable: {:#010x},", gpio.interrupt_enable).unwrap();
    writeln!(out, "    }},").unwrap();
    writeln!(out, "    irq: IrqConfig {{ even: {}, odd: {} }},", irq.even, irq.odd).unwrap();
    writeln!(out, "}};").unwrap();

    fs::write(out_dir.join("board_config.rs"), out).unwrap();
}
