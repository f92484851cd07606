//! Data Transfer Objects for REST request/response serialization.

pub mod report_dto;
pub mod system_dto;
pub mod user_dto;

pub use report_dto::*;
pub use system_dto::*;
pub use user_dto::*;
