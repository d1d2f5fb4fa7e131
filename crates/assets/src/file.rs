use std::path::Path;

use crate::AssetError;

/// Read a whole text file, logging the failure before returning it.
pub fn read_text(path: impl AsRef<Path>) -> Result<String, AssetError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|err| {
        tracing::error!(path = %path.display(), %err, "failed to open file");
        AssetError::Io(err)
    })
}
