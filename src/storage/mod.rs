pub mod blob_store;
pub mod codec;

pub use blob_store::{BlobStore, BlobStoreError};
pub use codec::CodecError;
