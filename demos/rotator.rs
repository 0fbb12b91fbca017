//! Cage rotator example.
//!
//! Demonstrates building a rotational stage from TOML configuration, moving it
//! to 90 degrees, homing it and shutting it down.
//!
//! Pass a serial number to talk to real hardware through the vendor library;
//! without arguments the scripted in-memory library stands in for it.

use kinesis_stage::binding::FakeLibrary;
use kinesis_stage::config::parse_config;
use kinesis_stage::motor::{StdClock, StdDelay};
use kinesis_stage::{
    error_text, DeviceConnection, KinesisLibrary, MotionControlLibrary, SingleAxisStage,
    StageConfig,
};

const CONFIG: &str = r#"
library = "Thorlabs.MotionControl.IntegratedStepperMotors.dll"
symbol_prefix = "ISC"
polling_interval_ms = 100

[stages.rotator]
serial_number = "55000001"
stage_type = "rotational"
device_units_per_revolution = 49152000.0
"#;

fn run<L: MotionControlLibrary>(library: &L, config: &StageConfig, serial: &str) -> kinesis_stage::Result<()> {
    let connection = DeviceConnection::open(library, serial);
    connection.check()?;
    println!("Controller {} has {} channel(s)", serial, connection.channel_count()?);

    let mut stage = SingleAxisStage::builder(&connection)
        .from_config(config, "rotator")?
        .clock(StdClock::new())
        .delay(StdDelay)
        .build()?;

    stage.initialize()?;
    println!("Initialized {} ({})", stage.name(), stage.lifecycle().as_str());
    if stage.polling_degraded() {
        println!("Warning: status polling is not running");
    }

    stage.set_position(90.0)?;
    while stage.is_busy()? {
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
    println!("Position: {:.3} deg", stage.position()?);

    match stage.home() {
        Ok(()) => println!("Homing started"),
        Err(e) if e.is_unsupported() => println!("Stage cannot home"),
        Err(e) => return Err(e),
    }
    while stage.is_busy()? {
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    stage.shutdown()
}

fn main() {
    println!("=== Cage Rotator Example ===\n");

    let mut config = parse_config(CONFIG).expect("built-in configuration is valid");

    let result = match std::env::args().nth(1) {
        Some(serial) => {
            if let Some(entry) = config.stages.values_mut().next() {
                entry.serial_number = heapless::String::try_from(serial.as_str()).unwrap_or_default();
            }
            let library = KinesisLibrary::shared(config.library.as_str(), &config.symbol_prefix);
            run(library, &config, &serial)
        }
        None => {
            let library = FakeLibrary::with_device("55000001");
            run(&library, &config, "55000001")
        }
    };

    if let Err(e) = result {
        let text = error_text(e.code()).unwrap_or("Unknown error");
        eprintln!("Error {}: {} ({})", e.code(), text, e);
        std::process::exit(1);
    }

    println!("\n=== Example Complete ===");
}
