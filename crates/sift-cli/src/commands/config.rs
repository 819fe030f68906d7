//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    if args.init {
        if path.exists() {
            eprintln!(
                "{}",
                formatter.warning(&format!("{} already exists, leaving it alone", path.display()))
            );
        } else {
            Config::default().save(path)?;
            eprintln!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", path.display()))
            );
        }
        return Ok(());
    }

    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    eprintln!("{}", formatter.info(&format!("Configuration file: {}", source)));
    println!("{}", config.to_toml()?);
    Ok(())
}
