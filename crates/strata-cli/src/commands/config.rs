use anyhow::{bail, Result};

use strata_core::AppConfig;

pub fn run(config: &AppConfig, write: bool, force: bool) -> Result<()> {
    if !write {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "{} already exists.\nUse --force to overwrite it with the defaults.",
            path.display()
        );
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
