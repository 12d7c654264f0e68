// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints that do not require authentication, for both
// identity spaces: sellers (`seller_token`) and store customers (`store_token`).

pub mod customer; // POST /api/auth/store-register, /api/auth/store-login
pub mod register; // POST /api/auth/register
pub mod session;  // POST /api/auth/login, /api/auth/logout
pub mod utils;

pub use customer::{store_login_post, store_register_post};
pub use register::register_post;
pub use session::{login_post, logout_post};
