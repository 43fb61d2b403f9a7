//! Filesystem adapters.

mod disk_upload_store;

pub use disk_upload_store::DiskUploadStore;
