// handlers/protected/auth/mod.rs - Session introspection for both identity spaces

pub mod session; // GET /api/auth/me, GET /api/auth/verify-store-token

pub use session::{me_get, verify_store_token_get};
