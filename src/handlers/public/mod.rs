// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, storefront lookups and the shopping assistant.
// Store-scoped paths still pass through the tenant router, which lets every
// route in this tier through without credentials.

pub mod ai;
pub mod auth;
pub mod store;
