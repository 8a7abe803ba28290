// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: /courses/*, /student/blog/*
// Middleware: none beyond the global CORS/trace/timeout layers

pub mod blogs;
pub mod courses;

pub use blogs::*;
pub use courses::*;
