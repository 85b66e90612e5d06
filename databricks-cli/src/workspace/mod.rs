mod notebook;
mod sync;

pub use notebook::{export_notebook, import_notebook};
pub use sync::{SyncError, SyncReport, export_dir, import_dir};
