use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::state::AppState;

// GET /api/services/images
//
// Lists the gallery images dropped into the assets directory. Only `.png`
// files count; anything else in the directory is ignored. The returned paths
// are URLs under the static /assets mount.
pub async fn service_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    let dir = Path::new(&state.config.assets_dir).join("services");

    let mut images = vec![];
    if dir.is_dir() {
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to read assets: {e}")))?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.to_lowercase().ends_with(".png") {
                images.push(format!("/assets/services/{name}"));
            }
        }
    }

    images.sort();
    Ok(Json(images))
}
