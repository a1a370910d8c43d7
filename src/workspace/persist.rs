//! Whole-file reads and writes for the files under the marker directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;

use crate::error::{Error, Result};

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.tmp", name))
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
///
/// A crash leaves either the old file or the new one, never a torn write.
/// Each persisted file is its own resource; nothing groups writes across files.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_path_for(path);
    fs::write(&tmp, contents).map_err(|e| Error::write(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::write(path, e));
    }
    Ok(())
}

/// Load a JSON record whose top level must be an object.
///
/// An absent file yields `T::default()`. Any other top-level value, including
/// an array, is a parse error rather than an empty record.
pub fn read_json_object<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(Error::io(path, e)),
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| Error::parse(path, e))?;
    if !value.is_object() {
        return Err(Error::parse(
            path,
            serde_json::Error::custom("expected a JSON object at the top level"),
        ));
    }
    serde_json::from_value(value).map_err(|e| Error::parse(path, e))
}

/// Pretty-print `value` and store it with [`write_atomic`].
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| Error::serialize(path, e))?;
    write_atomic(path, content.as_bytes())
}
