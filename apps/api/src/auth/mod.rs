pub mod access;
pub mod extractor;
pub mod handlers;

pub use access::{can_access, Denied, Identity};
pub use extractor::AuthUser;
