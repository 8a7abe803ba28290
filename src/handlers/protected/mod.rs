// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /instructor/blog/*, plus the enrollment and blog reaction
// routes under /student/*
// Middleware: jwt_auth_middleware, which inserts the caller's AuthUser

pub mod blog_reactions;
pub mod enrollment;
pub mod instructor_blogs;

pub use blog_reactions::*;
pub use enrollment::*;
pub use instructor_blogs::*;
