//! Authentication service
//!
//! Handles signup, role-checked login, and token refresh.

use arogya_common::auth::{hash_password, validate_password_strength, verify_password};
use arogya_common::AppError;
use arogya_core::{DoctorProfile, Role, User, UserId};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, SignupRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and log it in
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        validate_password_strength(&request.password)?;

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash = hash_password(&request.password)?;

        let id = UserId::generate();
        let email = request.email.trim().to_string();
        let user = match request.role {
            Role::Patient => User::patient(id, request.name, email),
            Role::Doctor => User::doctor(
                id,
                request.name,
                email,
                DoctorProfile {
                    specialization: request.specialization.unwrap_or_default(),
                    hospital: request.hospital.filter(|h| !h.trim().is_empty()),
                    consultation_fee: 0,
                    report_fee: 0,
                },
            ),
        };

        self.ctx.user_repo().create(&user, &password_hash).await?;
        info!(user_id = %user.id, "User signed up");

        self.session_for(&user)
    }

    /// Log in with email, password, and the role the user claims
    ///
    /// A wrong role is reported exactly like a wrong password.
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let Some(user) = self.ctx.user_repo().find_by_email(&request.email).await? else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials.into());
        };

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(&user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials.into());
        }

        if user.role != request.role {
            warn!(user_id = %user.id, actual = %user.role, "Login failed: role mismatch");
            return Err(AppError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.session_for(&user)
    }

    /// Exchange a refresh token for a new pair
    #[instrument(skip_all)]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user = self.current_user(&claims.user_id()?).await?;

        if user.role != claims.role {
            return Err(AppError::InvalidToken.into());
        }

        self.session_for(&user)
    }

    /// Look up the authenticated user
    pub async fn current_user(&self, user_id: &UserId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    fn session_for(&self, user: &User) -> ServiceResult<AuthResponse> {
        let pair = self.ctx.jwt_service().generate_token_pair(&user.id, user.role)?;
        Ok(AuthResponse::new(pair, CurrentUserResponse::from(user)))
    }
}
