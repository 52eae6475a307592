//! Central configuration for the identity_sync crate

use std::sync::LazyLock;

const DEFAULT_WEBHOOK_ROUTE_PATH: &str = "/clerk-webhook";

/// Path the webhook endpoint is mounted on
///
/// Default: "/clerk-webhook". A leading `/` is added when the configured value lacks one.
pub static WEBHOOK_ROUTE_PATH: LazyLock<String> =
    LazyLock::new(|| route_path_from(std::env::var("WEBHOOK_ROUTE_PATH").ok()));

fn route_path_from(value: Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_WEBHOOK_ROUTE_PATH.to_string(),
        Some(path) if path.starts_with('/') => path.to_string(),
        Some(path) => format!("/{path}"),
    }
}
