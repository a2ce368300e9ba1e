use crate::domain::errors::ConfigError;
use crate::domain::workspace::Workspace;
use std::path::{Path, PathBuf};

/// File names tried, in order, when no config file is given
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["courier.yaml", "courier.yml", "courier.json"];

/// Locates and decodes the workspace document
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    /// Loader that looks for default config files in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// The explicit file when given, otherwise the first default file present
    pub fn locate(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(ConfigError::NotFound {
                tried: path.display().to_string(),
            });
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                tried: DEFAULT_CONFIG_FILES.join(", "),
            })
    }

    pub fn load(&self, explicit: Option<&Path>) -> Result<Workspace, ConfigError> {
        let path = self.locate(explicit)?;
        tracing::debug!("loading workspace from '{}'", path.display());

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::decode(&path, &content)
    }

    /// Decodes `content` as JSON for `.json` files and as YAML otherwise
    pub fn decode(path: &Path, content: &str) -> Result<Workspace, ConfigError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let decoded: Result<Workspace, String> = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };
        decoded.map_err(|message| ConfigError::Decode {
            path: path.to_path_buf(),
            message,
        })
    }
}
