// handlers/mod.rs - HTTP handlers grouped by security tier
//
// public:    no token required (course catalogue, published blogs)
// protected: JWT required; the caller's AuthUser is read from request extensions

pub mod protected;
pub mod public;
