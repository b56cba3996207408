//! Media Module
//!
//! Image uploads: reading multipart request bodies and storing the images
//! they carry.
//!
//! # Module Structure
//!
//! ```text
//! media/
//! ├── mod.rs    - Module exports
//! ├── store.rs  - MediaStore: write/remove images under the upload directory
//! └── form.rs   - Multipart body reader and the JSON-or-form `Submission` extractor
//! ```
//!
//! Stored images are served by the router at `/uploads/<name>`; that path is
//! the durable URL recorded on posts and profiles.

/// Upload directory storage
pub mod store;

/// Multipart form reader
pub mod form;

pub use form::{read_form, ImageUpload, Submission, UploadForm};
pub use store::MediaStore;
