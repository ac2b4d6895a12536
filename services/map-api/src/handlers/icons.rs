//! Station icon endpoint.

use axum::{
    extract::{Extension, Path},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use super::common::error_response;
use crate::metrics::IconOutcome;
use crate::state::AppState;

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
const X_ICON_ID: HeaderName = HeaderName::from_static("x-icon-id");

/// Canonical ids embed every drawn value, so their pixels never change.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";
/// Station-keyed ids follow the displayed snapshot.
const REVALIDATE: &str = "no-cache";

fn png_response(png: Bytes, canonical_id: &str, cache_status: &'static str, immutable: bool) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, if immutable { IMMUTABLE } else { REVALIDATE }),
            (X_CACHE, cache_status),
            (X_ICON_ID, canonical_id),
        ],
        png,
    )
        .into_response()
}

/// GET /icons/:id - PNG for a `stationv1::` icon id
///
/// Unknown ids answer 404 with no image. Rendered icons are cached under
/// their canonical id, so a station-keyed id and the self-describing id it
/// resolves to share one entry.
pub async fn icon_handler(Extension(state): Extension<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let request = match state.icons.decode(&id) {
        Ok(request) => request,
        Err(e) => {
            state.metrics.record_icon_request(IconOutcome::Unknown);
            return error_response(&e);
        }
    };
    let canonical_id = request.to_id();
    let immutable = canonical_id == id;

    if let Some(png) = state.icon_cache.get(&canonical_id).await {
        state.metrics.record_icon_request(IconOutcome::Hit);
        return png_response(png, &canonical_id, "HIT", immutable);
    }

    let start = Instant::now();
    match state.icons.encode(&request) {
        Ok(icon) => {
            state.metrics.record_icon_render(start.elapsed());
            state.metrics.record_icon_request(IconOutcome::Miss);
            debug!(icon_id = %id, canonical_id = %canonical_id, bytes = icon.png.len(), "Rendered icon");

            let png = Bytes::from(icon.png);
            state.icon_cache.insert(&canonical_id, png.clone()).await;
            png_response(png, &canonical_id, "MISS", immutable)
        }
        Err(e) => {
            error!(icon_id = %id, error = %e, "Icon rendering failed");
            state.metrics.record_icon_request(IconOutcome::Error);
            error_response(&e)
        }
    }
}
