use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://ec-course-api.hexschool.io/v2";
pub const API_BASE_ENV: &str = "CATALOG_API_BASE";
pub const API_PATH_ENV: &str = "CATALOG_API_PATH";

/// Name of the cookie entry holding the session token.
pub const TOKEN_COOKIE: &str = "hexToken";

/// Display unit given to freshly created products.
pub const DEFAULT_UNIT: &str = "元";

pub const LOGIN_FAILED_ALERT: &str = "please log in again";
pub const MUTATION_FAILED_ALERT: &str = "the request could not be completed";

pub const SIGNIN_PATH: &str = "/admin/signin";
pub const CHECK_PATH: &str = "/api/user/check";

pub fn products_path(api_path: &str) -> String {
    format!("/api/{}/admin/products", api_path)
}

pub fn product_path(api_path: &str) -> String {
    format!("/api/{}/admin/product", api_path)
}

pub fn product_item_path(api_path: &str, id: &str) -> String {
    format!("/api/{}/admin/product/{}", api_path, id)
}

/// API base URL, from `CATALOG_API_BASE` or the course API default.
pub fn api_base_from_env() -> String {
    env::var(API_BASE_ENV)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Per-deployment API path segment, from `CATALOG_API_PATH`.
pub fn api_path_from_env() -> Option<String> {
    env::var(API_PATH_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn default_token_store_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("catalog-console").join("cookies.json")
    } else {
        PathBuf::from(".catalog-console").join("cookies.json")
    }
}
