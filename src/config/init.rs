use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config, RevenueConfig, ServerConfig, DEFAULT_BIND};
use crate::scoring::EngineWeights;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses as a number within `[min, max]`.
fn prompt_number(message: &str, default: f64, min: f64, max: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= min && v <= max => return Ok(v),
            Ok(_) => println!("  Invalid: must be between {} and {}. Try again.", min, max),
            Err(_) => println!("  Invalid: must be a number. Try again."),
        }
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

fn prompt_engines() -> Result<EngineWeights> {
    typewriter("Each AI engine's score counts toward the AI Visibility Index in proportion to its weight.");
    typewriter("Weights are rescaled to sum to 1, so '35, 25, 25, 15' works as well as '0.35, 0.25, 0.25, 0.15'.");
    let defaults = EngineWeights::default();
    let mut pairs: Vec<(String, f64)> = Vec::new();
    for (engine, weight) in defaults.iter() {
        let w = prompt_number(&format!("  Weight for {}", engine), weight, 0.0, f64::MAX)?;
        pairs.push((engine.to_string(), w));
    }

    let mut add_engine = prompt_yes_no("Track another engine?", false)?;
    while add_engine {
        let name = loop {
            let n = prompt("  Engine name: ")?;
            if !n.is_empty() {
                break n;
            }
            println!("  Engine name is required.");
        };
        let w = prompt_number(&format!("  Weight for {}", name), 0.1, 0.0, f64::MAX)?;
        pairs.push((name, w));
        add_engine = prompt_yes_no("  Add another engine?", false)?;
    }

    let weights = EngineWeights::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), *v)));
    if weights.total() <= 0.0 {
        println!("  All weights were zero; keeping the defaults.");
        return Ok(defaults);
    }
    Ok(weights)
}

fn prompt_revenue() -> Result<RevenueConfig> {
    typewriter("Revenue models turn visibility points into dollars using your store's numbers.");
    let defaults = RevenueConfig::default();
    let avg_gross_profit = prompt_number(
        "  Average gross profit per unit ($)",
        defaults.avg_gross_profit,
        0.0,
        f64::MAX,
    )?;
    let monthly_lead_volume = prompt_number(
        "  Monthly lead volume",
        defaults.monthly_lead_volume,
        0.0,
        f64::MAX,
    )?;
    let target_score = prompt_number("  Target visibility score", defaults.target_score, 0.0, 100.0)?;
    Ok(RevenueConfig {
        avg_gross_profit,
        monthly_lead_volume,
        target_score,
        ..defaults
    })
}

fn prompt_server() -> Result<ServerConfig> {
    let bind = loop {
        let input = prompt_with_default("Address for `dealer-score serve`", DEFAULT_BIND)?;
        match input.parse::<SocketAddr>() {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };
    Ok(ServerConfig {
        bind,
        ..ServerConfig::default()
    })
}

/// Serialize `config` and replace `path` in one step, creating parent
/// directories as needed.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "config written");
    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Dealer Score Configuration Wizard");
    println!("=================================");
    println!();

    // 1. Engine weights
    let engines = if prompt_yes_no("Configure AI engine weights? (n accepts defaults)", false)? {
        println!();
        Some(prompt_engines()?)
    } else {
        None
    };

    // 2. Dealership economics
    println!();
    let revenue = if prompt_yes_no("Configure dealership economics? (n accepts defaults)", true)? {
        println!();
        Some(prompt_revenue()?)
    } else {
        None
    };

    // 3. Server
    println!();
    let server = Some(prompt_server()?);

    // 4. Config path
    let default_config_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        engines,
        revenue,
        server,
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `dealer-score serve` to start the API.");

    Ok(())
}
