use anyhow::{Context, Result};
use shared::SpeciesCatalog;
use sim::{SimConfig, SpeciesRegistry};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TICK_MS: u64 = 1000;

/// Everything the client reads from its environment before starting
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: SimConfig,
    /// Extra species on top of the built-in ones
    pub catalog: Option<SpeciesCatalog>,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
    /// Run this many ticks without a terminal UI
    pub headless: Option<u64>,
    pub tick: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match lookup("SAVANNAH_CONFIG") {
            Some(path) => load_config(Path::new(&path))?,
            None => SimConfig::default(),
        };

        let catalog = lookup("SAVANNAH_CATALOG")
            .map(|path| load_catalog(Path::new(&path)))
            .transpose()?;

        let seed = parse_var(&lookup, "SAVANNAH_SEED")?;
        let headless = parse_var(&lookup, "SAVANNAH_HEADLESS")?;
        let tick_ms = parse_var(&lookup, "SAVANNAH_TICK_MS")?.unwrap_or(DEFAULT_TICK_MS);

        Ok(Self {
            config,
            catalog,
            seed,
            headless,
            tick: Duration::from_millis(tick_ms),
        })
    }

    /// Built-in species plus the catalog's, if any
    pub fn registry(&self) -> Result<SpeciesRegistry> {
        let mut registry = SpeciesRegistry::built_in();
        if let Some(catalog) = &self.catalog {
            registry
                .extend_from_catalog(catalog)
                .context("Failed to register catalog species")?;
        }
        Ok(registry)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, value))
        })
        .transpose()
}

pub fn load_config(path: &Path) -> Result<SimConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

pub fn load_catalog(path: &Path) -> Result<SpeciesCatalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read species catalog {}", path.display()))?;
    SpeciesCatalog::from_json(&json)
        .with_context(|| format!("Failed to load species catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();

        assert_eq!(settings.config, SimConfig::default());
        assert!(settings.catalog.is_none());
        assert_eq!(settings.seed, None);
        assert_eq!(settings.headless, None);
        assert_eq!(settings.tick, Duration::from_secs(1));
        assert_eq!(settings.registry().unwrap().len(), 4);
    }

    #[test]
    fn test_numeric_vars() {
        let settings = Settings::from_lookup(lookup(&[
            ("SAVANNAH_SEED", "42"),
            ("SAVANNAH_HEADLESS", " 100 "),
            ("SAVANNAH_TICK_MS", "50"),
        ]))
        .unwrap();

        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.headless, Some(100));
        assert_eq!(settings.tick, Duration::from_millis(50));
    }

    #[test]
    fn test_bad_number_names_the_variable() {
        let err = Settings::from_lookup(lookup(&[("SAVANNAH_SEED", "forty")])).unwrap_err();
        assert!(err.to_string().contains("SAVANNAH_SEED"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Settings::from_lookup(lookup(&[(
            "SAVANNAH_CONFIG",
            "/nonexistent/savannah-config.json",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_files_are_loaded() {
        let dir = env::temp_dir().join(format!("savannah-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.json");
        fs::write(&config_path, r#"{"board_width": 20, "initial_population": {"R": 3}}"#).unwrap();

        let catalog_path = dir.join("catalog.json");
        fs::write(
            &catalog_path,
            r#"{"version": 1, "entries": [{"trigger": "h", "species": {
                "name": "Hyena", "role": "Predator", "glyph": "H",
                "vision": 3, "initial_health": 90.0}}]}"#,
        )
        .unwrap();

        let settings = Settings::from_lookup(lookup(&[
            ("SAVANNAH_CONFIG", config_path.to_str().unwrap()),
            ("SAVANNAH_CATALOG", catalog_path.to_str().unwrap()),
        ]))
        .unwrap();

        assert_eq!(settings.config.board_width, 20);
        assert_eq!(settings.config.initial_population.get(&'R'), Some(&3));

        let registry = settings.registry().unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get('H').map(|s| s.name()), Some("Hyena"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_catalog_clash_with_built_in() {
        let mut settings = Settings::from_lookup(lookup(&[])).unwrap();
        settings.catalog = Some(SpeciesCatalog::built_in());

        let err = settings.registry().unwrap_err();
        assert!(err.to_string().contains("Failed to register catalog species"));
    }
}
