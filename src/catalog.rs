//! Film catalog: the films the user can pick from when building lists.
//!
//! The catalog is a JSON array of film objects on disk. It is read once at
//! startup and handed to the controller; list operations never write to it.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::film::Film;

/// Load the catalog at `path`. `None` means no catalog is configured and
/// yields an empty one; a configured path that cannot be read is an error.
pub fn load(path: Option<&Path>) -> Result<Vec<Film>, AppError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Catalog(format!("cannot read {}: {e}", path.display())))?;
    let films: Vec<Film> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Catalog(format!("malformed {}: {e}", path.display())))?;
    info!(path = %path.display(), films = films.len(), "catalog loaded");
    Ok(films)
}
