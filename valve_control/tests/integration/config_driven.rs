//! Valves built from configuration files.

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use valve_common::clock::ManualClock;
use valve_common::config::{ConfigError, LogFormat};
use valve_common::io::ProcessImage;
use valve_common::state::{CommandCode, StateCode};
use valve_control::config::load_valve_config;
use valve_control::{Valve, ValveType};

fn write_config(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn gate_valve_from_file_uses_overridden_paths() {
    let file = write_config(
        r#"
[log]
format = "json"

[valve]
name = "Gate3"
serial = "SN-0003"
kind = "double_throw"
motion_timeout_ms = 1500

[valve.points]
"OPENED?" = "rack1/slot3/di0"
"OPEN!" = "rack1/slot4/do0"
"#,
    );
    let cfg = load_valve_config(file.path()).unwrap();
    assert_eq!(cfg.log.format, LogFormat::Json);
    assert_eq!(cfg.valve.kind, ValveType::DoubleThrow);

    let image = ProcessImage::new();
    let clock = Arc::new(ManualClock::new(0));
    let mut valve = Valve::from_config(&cfg.valve, &image, clock.clone()).unwrap();
    assert_eq!(valve.device().serial(), "SN-0003");

    image.write("Gate3OPEN_OK?", true);
    valve.set_command(CommandCode::Open);
    valve.on_data_changed();
    assert_eq!(valve.state(), StateCode::Opening);
    assert_eq!(image.read("rack1/slot4/do0"), Some(true));
    assert_eq!(image.read("Gate3OPEN!"), None);

    image.write("rack1/slot3/di0", true);
    valve.on_data_changed();
    assert_eq!(valve.state(), StateCode::Idle);
}

#[test]
fn configured_timeout_applies() {
    let file = write_config(
        "[valve]\nname = \"V2\"\nkind = \"single_throw\"\nmotion_timeout_ms = 50\n",
    );
    let cfg = load_valve_config(file.path()).unwrap();
    let image = ProcessImage::new();
    let clock = Arc::new(ManualClock::new(0));
    let mut valve = Valve::from_config(&cfg.valve, &image, clock.clone()).unwrap();

    valve.set_command(CommandCode::Close);
    valve.on_data_changed();
    assert_eq!(valve.state(), StateCode::Waiting);

    clock.advance_ms(50);
    valve.on_timeout_tick();
    assert_eq!(valve.state(), StateCode::Waiting);
    clock.advance(1);
    valve.on_timeout_tick();
    assert_eq!(valve.state(), StateCode::Invalid);
}

#[test]
fn invalid_files_are_rejected() {
    let missing_name = write_config("[valve]\nname = \"\"\nkind = \"single_throw\"\n");
    assert!(matches!(
        load_valve_config(missing_name.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let missing_valve = write_config("[log]\nlevel = \"info\"\n");
    assert!(matches!(
        load_valve_config(missing_valve.path()),
        Err(ConfigError::ParseError(_))
    ));

    assert!(matches!(
        load_valve_config(std::path::Path::new("/nonexistent/valve.toml")),
        Err(ConfigError::FileNotFound)
    ));
}
