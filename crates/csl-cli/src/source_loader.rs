use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csl_core::{ScriptError, ScriptSource};
use walkdir::WalkDir;

use crate::cli_args::SourceArgs;

/// Collect scripts from the configured sources. Directory scripts are
/// loaded after the config file, so a *.csl file wins on a name clash.
pub(crate) fn load_scripts(
    sources: &SourceArgs,
) -> Result<BTreeMap<String, ScriptSource>, ScriptError> {
    let mut scripts = BTreeMap::new();

    if let Some(config) = &sources.config {
        scripts.extend(read_config_file(Path::new(config))?);
    }
    if let Some(dir) = &sources.scripts_dir {
        scripts.extend(read_scripts_dir(&resolve_dir(dir)?)?);
    }

    Ok(scripts)
}

fn read_config_file(path: &Path) -> Result<BTreeMap<String, ScriptSource>, ScriptError> {
    let text = fs::read_to_string(path).map_err(|err| {
        ScriptError::new(
            "CLI_SOURCE_READ",
            format!("Failed to read {}: {}", path.display(), err),
        )
    })?;
    serde_json::from_str(&text).map_err(|err| {
        ScriptError::new(
            "CLI_CONFIG_PARSE",
            format!("Failed to parse {}: {}", path.display(), err),
        )
    })
}

fn read_scripts_dir(root: &Path) -> Result<BTreeMap<String, ScriptSource>, ScriptError> {
    let mut scripts = BTreeMap::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            ScriptError::new(
                "CLI_SOURCE_READ",
                format!("Failed to scan {}: {}", root.display(), err),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("csl")
        {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(path).map_err(|err| {
            ScriptError::new(
                "CLI_SOURCE_READ",
                format!("Failed to read {}: {}", path.display(), err),
            )
        })?;
        scripts.insert(name.to_string(), ScriptSource::Source(text));
    }
    Ok(scripts)
}

fn resolve_dir(dir: &str) -> Result<PathBuf, ScriptError> {
    let path = PathBuf::from(dir);
    if !path.is_dir() {
        return Err(ScriptError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", path.display()),
        ));
    }
    Ok(path)
}
