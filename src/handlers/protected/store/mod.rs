// handlers/protected/store/mod.rs - Customer-only storefront endpoints
//
// The tenant router has already checked the `store_token` cookie against the
// path's store; these handlers re-resolve the customer against the stored data.

pub mod account; // GET /api/store/:slug/account, GET /api/store/:slug/orders

pub use account::{account_get, orders_get};
