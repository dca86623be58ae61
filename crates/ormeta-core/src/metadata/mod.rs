//! Declaration metadata storage.

mod key;
mod store;

pub use key::MetadataKey;
pub use store::MetadataStore;
