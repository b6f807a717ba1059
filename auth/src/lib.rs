//! Authentication utilities library
//!
//! Provides reusable password-hashing infrastructure for services:
//! - Adaptive salted hashing (Argon2id) with a configurable work factor
//! - Verification against stored PHC-format hashes
//!
//! Each service defines its own authentication traits and adapts this
//! implementation. This avoids coupling services through shared domain logic
//! while reducing code duplication.
//!
//! # Examples
//!
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(2);
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```

pub mod password;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
