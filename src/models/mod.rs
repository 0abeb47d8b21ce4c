pub mod ai;
pub mod common;
pub mod evaluations;
pub mod rubrics;
pub mod submissions;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::{ApiResponse, ErrorBody};
