//! Authentication and authorization.
//!
//! Passwords are stored as Argon2 PHC strings, sessions are HS256 JWTs, and the access guard
//! middleware resolves the caller before role checks run.

mod guard;
mod password;
mod token;

pub use guard::*;
pub use password::*;
pub use token::*;
