mod fetch;
mod migrate;
mod store;

pub use fetch::fetch_state;
pub use migrate::migrate;
pub use store::save_state;
