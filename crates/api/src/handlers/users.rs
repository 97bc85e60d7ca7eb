//! Handlers for signup, sign-in, and account lookup.
//!
//! Account creation is gated by an emailed one-time code: `send_code`
//! issues it, `signup` consumes it. Sign-in returns a 24-hour bearer token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use caravel_core::error::CoreError;
use caravel_core::types::DbId;
use caravel_core::verification;
use caravel_db::models::user::{CreateUser, UserResponse};
use caravel_db::repositories::{UserRepo, VerificationRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/send-code`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Response for `POST /auth/send-code`. Never carries the code itself.
#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub email: String,
}

/// Request body for `POST /auth/signup` (code consumption).
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub lastname: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response: public user fields plus the bearer token.
#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Decoded token identity returned by `POST /auth/status`.
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/send-code
///
/// Issue a verification code for an unregistered email. Rejects when an
/// account already exists, or when an unexpired code is pending (the
/// conflict carries the remaining wait in whole minutes).
pub async fn send_code(
    State(state): State<AppState>,
    Json(input): Json<SendCodeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SendCodeResponse>>)> {
    input.validate()?;

    // 1. An existing account is a terminal conflict.
    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    // 2. Enforce the resend cooldown; stale records are replaced.
    if let Some(pending) = VerificationRepo::find_by_email(&state.pool, &input.email).await? {
        match verification::minutes_remaining(pending.created_at, Utc::now()) {
            Some(minutes_remaining) => {
                return Err(AppError::CodeCooldown { minutes_remaining });
            }
            None => {
                VerificationRepo::delete(&state.pool, &input.email).await?;
            }
        }
    }

    // 3. Generate, store, and dispatch a fresh code.
    let code = verification::generate_code();
    VerificationRepo::upsert(&state.pool, &input.email, &code).await?;

    match &state.mailer {
        Some(mailer) => mailer.send_verification_code(&input.email, &code).await?,
        None => {
            tracing::warn!(email = %input.email, "SMTP not configured; verification email skipped")
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SendCodeResponse { email: input.email },
        }),
    ))
}

/// POST /api/v1/auth/signup
///
/// Consume a verification code and create the account. A wrong code and an
/// expired one are indistinguishable to the caller.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 1. Atomically consume the code; consumption deletes the record so a
    //    code can never be redeemed twice.
    let consumed = VerificationRepo::consume(&state.pool, &input.email, &input.code).await?;
    if !consumed {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid or expired verification code".into(),
        )));
    }

    // 2. Hash the password and create the verified account. A concurrent
    //    duplicate trips `uq_users_email` and surfaces as a conflict.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            firstname: input.firstname,
            lastname: input.lastname,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/signin
///
/// A missing account and a wrong password produce the identical response,
/// so the endpoint cannot be used to enumerate registered emails.
pub async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninRequest>,
) -> AppResult<Json<DataResponse<SigninResponse>>> {
    // 1. Look up the account.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // 2. Verify the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    // 3. Unverified accounts cannot sign in.
    if !user.is_verified {
        return Err(AppError::Core(CoreError::Forbidden(
            "Email not verified. Please verify your email first.".into(),
        )));
    }

    // 4. Issue the bearer token.
    let name = format!("{} {}", user.firstname, user.lastname);
    let token = generate_token(user.id, &user.email, &name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(DataResponse {
        data: SigninResponse {
            user: UserResponse::from(user),
            token,
        },
    }))
}

/// POST /api/v1/auth/status
///
/// Echo the identity claims of a valid bearer token; 401 otherwise (the
/// extractor rejects before the handler runs).
pub async fn status(user: AuthUser) -> Json<DataResponse<AuthStatusResponse>> {
    Json(DataResponse {
        data: AuthStatusResponse {
            id: user.user_id,
            email: user.email,
            name: user.name,
        },
    })
}

/// GET /api/v1/users/{id}
///
/// A bearer token may only fetch its own account.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if auth.user_id != id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only access your own account".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}
