pub mod database;
mod error;

pub(crate) fn env(key: &str) -> Option<String> {
    dotenvy::var(key).ok()
}
