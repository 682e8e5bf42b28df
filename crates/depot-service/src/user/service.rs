//! Registration, login, and admin user management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use depot_auth::jwt::encoder::IssuedToken;
use depot_auth::{JwtEncoder, PasswordHasher};
use depot_core::config::AuthConfig;
use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_database::repositories::UserRepository;
use depot_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Manages user accounts and credentials.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    password_min_length: usize,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            password_min_length: config.password_min_length,
        }
    }

    /// Registers a new regular user.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        self.register_with_role(username, email, password, UserRole::User)
            .await
    }

    /// Registers a new user with an explicit role.
    pub async fn register_with_role(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        if password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("Username already taken"));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Registered user");
        Ok(user)
    }

    /// Verifies credentials and issues a token.
    ///
    /// A missing user and a wrong password produce the same error, so
    /// login failures do not reveal which usernames exist.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, IssuedToken)> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid username or password"));
        }

        let token = self
            .encoder
            .generate_token(user.id, user.role, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok((user, token))
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Lists all users. Admin only.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }
        self.users.list_all().await
    }

    /// Changes a user's role. Admin only; admins may not demote
    /// themselves.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }
        if ctx.user_id == user_id && !role.is_admin() {
            return Err(AppError::validation(
                "Administrators cannot demote themselves",
            ));
        }

        let rows = self.users.update_role(user_id, role).await?;
        if rows == 0 {
            return Err(AppError::not_found("User not found"));
        }

        info!(%user_id, role = %role, "Updated user role");
        self.get_user(user_id).await
    }

    /// Deletes a user. Admin only; admins may not delete themselves.
    ///
    /// The relational cascade removes the user's folders, files, and
    /// grants; physical blobs under the upload root are not swept.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }
        if ctx.user_id == user_id {
            return Err(AppError::validation(
                "Administrators cannot delete themselves",
            ));
        }

        if !self.users.delete(user_id).await? {
            return Err(AppError::not_found("User not found"));
        }

        info!(%user_id, "Deleted user");
        Ok(())
    }
}
