//! Authentication and request identity
//!
//! Bearer tokens are HS256 JWTs issued by the identity provider; `sub` is the
//! board owner id. Public endpoints identify callers by IP only.

mod extractor;
pub mod jwt;

pub use extractor::{ClientIp, ClientOrigin, extract_ip};
pub use jwt::{Claims, CurrentUser, create_token, verify_token};
