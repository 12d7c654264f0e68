// handlers/protected/mod.rs - Protected handlers (token required)
//
// Seller endpoints read `Authorization: Bearer` or the `seller_token` cookie;
// store customer endpoints read the `store_token` cookie. Each handler
// resolves its principal through the auth resolver before doing anything else.

pub mod auth;      // GET /api/auth/me, /api/auth/verify-store-token
pub mod dashboard; // /api/dashboard/*
pub mod store;     // /api/store/:slug/{account,orders}
