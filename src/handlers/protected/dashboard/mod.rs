// handlers/protected/dashboard/mod.rs - Seller dashboard
//
// Every handler resolves the seller first; the seller's first store is the
// implicit scope for anything store-specific.

pub mod orders; // PATCH /api/dashboard/orders/:id
pub mod stats;  // GET /api/dashboard/stats

pub use orders::order_patch;
pub use stats::stats_get;
