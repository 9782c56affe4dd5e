use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use plainly_config::Config;
use serde::{Deserialize, Serialize};

/// Per-user config folder
pub fn plainly_root() -> anyhow::Result<PathBuf> {
    let base = dirs::config_dir().context("no per-user config directory on this platform")?;
    Ok(base.join("plainly"))
}

fn profiles_dir() -> anyhow::Result<PathBuf> {
    Ok(plainly_root()?.join("profiles"))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Initialize user config folders and main profile if missing
pub fn init_user_config() -> anyhow::Result<()> {
    let dir = profiles_dir()?;
    fs::create_dir_all(&dir)?;

    let main_profile = dir.join("main.json");

    if !main_profile.exists() {
        // Environment-derived defaults seed the main profile
        let profile = Profile {
            name: "main".into(),
            value: Config::new(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(name: &str) -> anyhow::Result<Config> {
    let dir = profiles_dir()?;
    let profile_file = dir.join(format!("{name}.json"));

    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
    let main_file = dir.join("main.json");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::new())
    }
}

fn read_profile(path: &std::path::Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("invalid profile {}", path.display()))?;
    Ok(profile.value)
}
