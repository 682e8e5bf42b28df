//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use depot_auth::Claims;
use depot_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted from verified token claims and passed into service methods
/// so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// The username (convenience field from token claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, username: String) -> Self {
        Self {
            user_id,
            role,
            username,
            request_time: Utc::now(),
        }
    }

    /// Builds a context from verified token claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.role, claims.username.clone())
    }

    /// Whether the acting user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
