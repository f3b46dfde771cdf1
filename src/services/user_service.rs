use regex::Regex;
use sqlx::PgPool;
use tracing::info;

use crate::auth::{self, AuthKeys};
use crate::db;
use crate::errors::AppError;
use crate::models::{CreateUser, LoginRequest, TokenResponse, User};

fn validate_username(username: &str) -> Result<(), AppError> {
    if !(3..=100).contains(&username.chars().count()) {
        return Err(AppError::Validation(
            "Username must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    if !pattern.is_match(email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".into(),
        ));
    }
    Ok(())
}

pub async fn register(pool: &PgPool, input: CreateUser) -> Result<User, AppError> {
    let username = input.username.trim().to_string();
    validate_username(&username)?;
    // Emails are stored lowercased so uniqueness is case-insensitive.
    let email = input.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_password(&input.password)?;

    if db::user_queries::email_exists(pool, &email).await? {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let password_hash = auth::hash_password(&input.password)?;
    let user = db::user_queries::insert(pool, User::new(username, email, password_hash)).await?;
    info!("User created: {}", user.username);
    Ok(user)
}

pub async fn login(
    pool: &PgPool,
    keys: &AuthKeys,
    input: LoginRequest,
) -> Result<TokenResponse, AppError> {
    let email = input.email.trim().to_lowercase();
    let user = db::user_queries::find_by_email(pool, &email)
        .await?
        .ok_or(AppError::Unauthorized)?;
    auth::verify_password(&input.password, &user.password_hash)?;

    if !user.is_active {
        return Err(AppError::Validation("Inactive user".into()));
    }

    let (access_token, expires_at) = keys.issue(user.id)?;
    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice").is_ok());
        assert!(validate_username(&"a".repeat(100)).is_ok());
        assert!(validate_username(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_password_strength_rules() {
        assert!(validate_password("Str0ngpass").is_ok());
        assert!(validate_password("Sh0rt").is_err());
        assert!(validate_password("alllower1").is_err());
        assert!(validate_password("ALLUPPER1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }
}
