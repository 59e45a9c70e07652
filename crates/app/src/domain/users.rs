//! Users
//!
//! Identity is issued by the authentication collaborator; the core only carries it.

use crate::uuids::TypedUuid;

/// Authenticated user marker.
#[derive(Debug)]
pub struct User;

/// Authenticated user UUID
pub type UserUuid = TypedUuid<User>;
