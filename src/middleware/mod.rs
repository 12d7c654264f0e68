pub mod request;
pub mod response;
pub mod tenant;

pub use request::{Validate, ValidJson, ValidQuery};
pub use response::{ApiResponse, ApiResult};
pub use tenant::tenant_router_middleware;
