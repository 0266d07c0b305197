mod env_overrides;
mod loader;
#[cfg(test)]
pub(super) mod test_env;
mod types;

pub(crate) use types::MAX_UTC_OFFSET_MINUTES;
pub use types::Config;
