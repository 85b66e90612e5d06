mod client;
mod dbfs;
mod language;
mod workspace;

pub use client::{ApiClient, ApiError, ErrorCode};
pub use dbfs::{BLOCK_SIZE, DbfsClient, FileInfo};
pub use language::{ParseEnumError, WorkspaceFormat, WorkspaceLanguage};
pub use reqwest::StatusCode;
pub use workspace::{ObjectInfo, ObjectType, WorkspaceClient};
