use std::fs;
use std::path::Path;

use mapdl_model::{FormatDescriptor, LineEnding};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Caller overrides applied when locating blocks in an archive.
///
/// Descriptors left as `None` are taken from the directive line that follows
/// each block header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecodeConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub nblock: Option<FormatDescriptor>,
    #[serde(default)]
    pub eblock: Option<FormatDescriptor>,
    /// Forces a line-ending policy instead of detecting it per block.
    #[serde(default)]
    pub line_ending: Option<LineEnding>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            nblock: None,
            eblock: None,
            line_ending: None,
        }
    }
}

pub fn save_config(path: impl AsRef<Path>, config: &DecodeConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(config)?)?;
    Ok(())
}

pub fn load_config(path: impl AsRef<Path>) -> Result<DecodeConfig> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn config_roundtrip_preserves_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("decode.json");
        let config = DecodeConfig {
            nblock: Some(FormatDescriptor::new(8, 20, 2).with_skip_widths(2, 2)),
            eblock: Some(FormatDescriptor::integers(7)),
            line_ending: Some(LineEnding::CrLf),
            ..DecodeConfig::default()
        };
        save_config(&path, &config).expect("save should succeed");
        let loaded = load_config(&path).expect("load should succeed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn sparse_json_fills_defaults() {
        let config: DecodeConfig =
            serde_json::from_str(r#"{"nblock": {"int_width": 9, "float_width": 21, "exponent_digits": 3}}"#)
                .expect("parse");
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.nblock, Some(FormatDescriptor::default()));
        assert!(config.eblock.is_none());
    }

    #[test]
    fn load_config_fails_for_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(dir.path().join("missing.json")).expect_err("missing file");
        assert!(matches!(err, DecodeError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn load_config_fails_for_invalid_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        fs::write(&path, b"{not json").expect("write");
        assert!(matches!(load_config(&path), Err(DecodeError::Json(_))));
    }
}
