pub const ENGINE_NAME: &str = "Kedarium Engine";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ENGINE_AUTHOR: &str = "marcothelost";
pub const ENGINE_LICENSE: &str = "GNU GPLv3";

/// One-line engine banner, e.g. for startup logs.
pub fn engine_info() -> String {
    format!("{ENGINE_NAME} v{ENGINE_VERSION} by {ENGINE_AUTHOR} ({ENGINE_LICENSE})")
}
