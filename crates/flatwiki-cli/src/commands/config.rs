//! Config command - show the effective configuration or write it out.

use flatwiki_core::Config;
use std::path::Path;

/// Run the config command.
///
/// With `init`, the configuration is written to `path` (or the default
/// location) so it can be edited. Otherwise it is printed as TOML.
pub fn run(config: &Config, path: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    if init {
        if target.exists() {
            anyhow::bail!("{} already exists", target.display());
        }
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        println!("Wrote configuration to {}", target.display());
        return Ok(());
    }

    println!("# {}", target.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("flatwiki.toml");

        let mut config = Config::default();
        config.query.max_suggestions = 3;
        run(&config, Some(&path), true).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.query.max_suggestions, 3);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flatwiki.toml");
        std::fs::write(&path, "[query]\nmax_suggestions = 2\n").unwrap();

        assert!(run(&Config::default(), Some(&path), true).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[query]\nmax_suggestions = 2\n"
        );
    }
}
