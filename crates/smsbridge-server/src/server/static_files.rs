use std::path::Path;
use tower_http::services::ServeDir;

/// Serve the frontend from `public_dir` for every unmatched route
pub fn static_service(public_dir: &Path) -> ServeDir {
    if !public_dir.is_dir() {
        tracing::warn!(
            dir = %public_dir.display(),
            "Public directory not found; static routes will return 404"
        );
    }
    ServeDir::new(public_dir).append_index_html_on_directories(true)
}
