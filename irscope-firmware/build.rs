//! Build script for irscope-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates scope.toml at compile time

use std::fs;
use std::path::Path;

fn main() {
    setup_linker();
    validate_config();
}

/// memory.x comes from embassy-stm32's `memory-x` feature
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if std::env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate scope.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=scope.toml");

    let config_path = Path::new("scope.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: scope.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds scope.toml as its board configuration.      ║\n\
            ║  Please create one in the irscope-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read scope.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in scope.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    warn_unknown(&config);
    validate_sensor(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_loop(&config, &mut errors);
    validate_menu(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in scope.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=scope.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keys each section understands; the firmware's parser applies the same
/// list and skips anything else
const KNOWN_KEYS: [(&str, &[&str]); 4] = [
    (
        "sensor",
        &["i2c_frequency", "i2c_logic_clock", "timeout_iterations", "frame_rate"],
    ),
    ("display", &["rotation", "backlight", "spi_prescaler"]),
    ("loop", &["frame_interval_ms", "tick_interval_ms"]),
    ("menu", &["unit", "palette", "offset", "gain"]),
];

/// Missing sections fall back to defaults and unknown names are ignored,
/// so these only warn
fn warn_unknown(config: &toml::Value) {
    let Some(root) = config.as_table() else {
        return;
    };
    for (name, value) in root {
        let known = KNOWN_KEYS.iter().find(|(section, _)| section == name);
        match (known, value) {
            (Some((_, keys)), toml::Value::Table(table)) => {
                for key in table.keys() {
                    if !keys.contains(&key.as_str()) {
                        println!("cargo:warning=scope.toml: ignoring unknown key [{}] {}", name, key);
                    }
                }
            }
            (Some(_), _) => {
                println!("cargo:warning=scope.toml: ignoring {} (not a table)", name);
            }
            (None, _) => {
                println!("cargo:warning=scope.toml: ignoring unknown entry {}", name);
            }
        }
    }
    for (section, _) in KNOWN_KEYS {
        if !matches!(root.get(section), Some(toml::Value::Table(_))) {
            println!("cargo:warning=scope.toml: no [{}] section, using defaults", section);
        }
    }
}

/// Value of `section.key`, only when `section` is a table
fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.as_table()?.get(key)
}

/// Check an optional integer key against an inclusive range
fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match lookup(config, section, key) {
        None => None,
        Some(toml::Value::Integer(n)) => {
            if *n < min || *n > max {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                None
            } else {
                Some(*n)
            }
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

/// Check an optional string key against a list of accepted values
fn check_choice(
    config: &toml::Value,
    section: &str,
    key: &str,
    accepted: &[&str],
    errors: &mut Vec<String>,
) {
    match lookup(config, section, key) {
        None => {}
        Some(toml::Value::String(s)) if accepted.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be one of {}",
            section,
            key,
            accepted.join(", ")
        )),
    }
}

/// `SensorConfig::default()` clocks
const DEFAULT_I2C_FREQUENCY: i64 = 100_000;
const DEFAULT_I2C_LOGIC_CLOCK: i64 = 2_000_000;

fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    let bus = check_range(config, "sensor", "i2c_frequency", 10_000, 400_000, errors);
    let logic = check_range(config, "sensor", "i2c_logic_clock", 1_000_000, 48_000_000, errors);
    // Absent keys take the firmware defaults
    let bus = bus.unwrap_or(DEFAULT_I2C_FREQUENCY);
    let logic = logic.unwrap_or(DEFAULT_I2C_LOGIC_CLOCK);
    if bus >= logic {
        errors.push("[sensor] i2c_frequency must be below i2c_logic_clock".to_string());
    }
    check_range(config, "sensor", "timeout_iterations", 1, u32::MAX as i64, errors);
    if let Some(rate) = check_range(config, "sensor", "frame_rate", 1, 10, errors) {
        if rate != 1 && rate != 10 {
            errors.push("[sensor] frame_rate must be 1 or 10".to_string());
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "display", "rotation", 0, 3, errors);
    if let Some(prescaler) = check_range(config, "display", "spi_prescaler", 2, 256, errors) {
        if !(prescaler as u32).is_power_of_two() {
            errors.push("[display] spi_prescaler must be a power of two".to_string());
        }
    }
    match lookup(config, "display", "backlight") {
        None | Some(toml::Value::Boolean(_)) => {}
        Some(_) => errors.push("[display] backlight must be true or false".to_string()),
    }
}

fn validate_loop(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "loop", "frame_interval_ms", 1, 60_000, errors);
    check_range(config, "loop", "tick_interval_ms", 1, 1_000, errors);
}

fn validate_menu(config: &toml::Value, errors: &mut Vec<String>) {
    check_choice(
        config,
        "menu",
        "unit",
        &["C", "c", "celsius", "F", "f", "fahrenheit"],
        errors,
    );
    check_choice(
        config,
        "menu",
        "palette",
        &["R", "red", "G", "green", "B", "blue", "W", "white"],
        errors,
    );
    check_range(config, "menu", "offset", -10, 20, errors);
    check_range(config, "menu", "gain", 0, 5, errors);
}
