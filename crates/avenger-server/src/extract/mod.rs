//! Request extractors with envelope-shaped rejections.
//!
//! - [`Json`] - JSON body; malformed bodies yield 400 "Invalid request body"
//! - [`Path`] - path parameters; malformed values yield 400 "Invalid ID parameter"
//! - [`ResourceId`] - strictly positive `{id}` segment
//! - [`Claims`] - caller identity set by the authorization middleware

mod auth_claims;
pub mod reject;
mod resource_id;

pub use crate::extract::auth_claims::Claims;
pub use crate::extract::reject::{Json, Path};
pub use crate::extract::resource_id::ResourceId;
