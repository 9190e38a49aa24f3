use std::{collections::HashMap, fs, path::Path};

use super::{vars, Config};

/// Reads, interpolates, parses and validates the configuration at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Vec<String>> {
    let input = fs::read_to_string(path).map_err(|error| {
        vec![format!("Could not read config file {:?}: {}", path, error)]
    })?;
    let vars: HashMap<String, String> = std::env::vars().collect();

    load_from_str(&input, &vars)
}

/// Parses configuration text, resolving variable references from `vars`.
pub fn load_from_str(
    input: &str,
    vars: &HashMap<String, String>,
) -> Result<Config, Vec<String>> {
    let interpolated = vars::interpolate(input, vars)?;
    for warning in interpolated.warnings {
        warn!("{}", warning);
    }

    let config: Config =
        toml::from_str(&interpolated.text).map_err(|error| vec![error.to_string()])?;
    config.validate()?;

    Ok(config)
}
