//! Interactive calibration and test utility for OpenStick.
//!
//! Mirrors the two modes of the on-device workflow: run the calibration
//! procedure and persist the result, or load the stored calibration and
//! print every event the stick produces.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use color_eyre::{eyre::eyre, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use openstick::hal::{GpioButton, Mcp3008};
use openstick::persistence::{CalibrationStore, FileStore};
use openstick::{CalibrationUi, Calibrator, Joystick, Sampler};

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    println!("OpenStick calibration utility");

    let a1: u8 = prompt("First ADC channel (0-7): ")?;
    let a2: u8 = prompt("Second ADC channel (0-7): ")?;
    let button_pin: u8 = prompt("Button GPIO pin (BCM): ")?;

    // Hardware initialisieren
    info!("Initializing hardware: channels {}/{}, button pin {}", a1, a2, button_pin);
    let adc = Arc::new(Mutex::new(Mcp3008::new()?));
    let ch_x = Mcp3008::channel(&adc, a1)?;
    let ch_y = Mcp3008::channel(&adc, a2)?;
    let button = GpioButton::new(button_pin)?;

    let store = FileStore::default_location()?;
    let mode: u8 = prompt("Enter 1 to test and 0 to calibrate: ")?;
    match mode {
        0 => {
            let mut sampler = Sampler::new(ch_x, ch_y, button, 3);
            let mut calibrator = Calibrator::new(&mut sampler, None);
            let mut ui = StdioUi;
            let calibration = calibrator.run(&mut ui).await?;
            store.save(&calibration).await?;
            println!("Calibration saved to {:?}", store.path());
        }
        1 => {
            let calibration = store
                .load()
                .await?
                .ok_or_else(|| eyre!("No stored calibration, run mode 0 first"))?;
            let mut joystick = Joystick::new(ch_x, ch_y, button, calibration, None);
            println!("Reporting events, Ctrl-C to quit...");
            // Nur Änderungen ausgeben, wie get() sie liefert
            while let Some(event) = joystick.wait(None).await? {
                if event.button.changed && event.button.pressed {
                    println!("button");
                } else {
                    println!("{:?}", event.direction);
                }
            }
        }
        other => return Err(eyre!("Invalid mode choice: {}", other)),
    }

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();
    Ok(())
}

fn prompt<T>(text: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    line.trim()
        .parse()
        .map_err(|e| eyre!("Invalid input '{}': {}", line.trim(), e))
}

/// stdin/stdout implementation of the calibration text layer.
struct StdioUi;

impl CalibrationUi for StdioUi {
    fn instruct(&mut self, text: &str) {
        println!("{}", text);
    }

    fn confirm(&mut self, text: &str) {
        print!("{} ", text);
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
    }
}
