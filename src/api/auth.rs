use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::database::CreateUserValues;
use crate::database::Database;
use crate::database::UpdateUserValues;
use crate::password;
use crate::users::User;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::JwtKeys;
use super::Message;
use super::Success;
use super::current_user::generate_token;
use super::utils::required;

/// Minimal length of a new password
const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user with a fresh access token
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    message: &'static str,
    user: UserResponse,
    token: String,
}

impl SessionResponse {
    fn new(jwt_keys: &JwtKeys, message: &'static str, user: &User) -> Result<Self, Error> {
        Ok(Self {
            message,
            user: UserResponse::from_user(user),
            token: generate_token(jwt_keys, user)?,
        })
    }
}

#[derive(Deserialize)]
pub struct RegisterForm {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

pub async fn register(
    Extension(database): Extension<Database>,
    Extension(jwt_keys): Extension<JwtKeys>,
    Form(form): Form<RegisterForm>,
) -> Result<Success<SessionResponse>, Error> {
    let (Some(username), Some(email), Some(password)) = (
        required(form.username),
        required(form.email),
        required(form.password),
    ) else {
        return Err(Error::bad_request("Username, email and password are required"));
    };

    ensure_unique_user(&database, &username, &email, None).await?;

    let password_hash = hash_password(&password)?;

    let user = database
        .create_user(&CreateUserValues {
            username: &username,
            email: &email,
            password_hash: &password_hash,
        })
        .await
        .map_err(Error::database_or_conflict("Username or email already exists"))?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(Success::created(SessionResponse::new(
        &jwt_keys,
        "Registration successful",
        &user,
    )?))
}

#[derive(Deserialize)]
pub struct LoginForm {
    /// Username or email address
    username: Option<String>,
    password: Option<String>,
}

pub async fn login(
    Extension(database): Extension<Database>,
    Extension(jwt_keys): Extension<JwtKeys>,
    Form(form): Form<LoginForm>,
) -> Result<Success<SessionResponse>, Error> {
    let (Some(username), Some(password)) = (required(form.username), required(form.password))
    else {
        return Err(Error::bad_request("Username and password are required"));
    };

    let user = database
        .find_single_user_by_login(&username)
        .await
        .map_err(Error::database)?;

    let Some(user) = user.filter(|user| password::verify(&user.password_hash, &password)) else {
        return Err(Error::unauthorized("Invalid username or password"));
    };

    Ok(Success::ok(SessionResponse::new(
        &jwt_keys,
        "Login successful",
        &user,
    )?))
}

pub async fn me(current_user: CurrentUser) -> Success<UserResponse> {
    Success::ok(UserResponse::from_user(&current_user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileForm {
    username: Option<String>,
    email: Option<String>,
    current_password: Option<String>,
    new_password: Option<String>,
}

pub async fn update_me(
    Extension(database): Extension<Database>,
    Extension(jwt_keys): Extension<JwtKeys>,
    current_user: CurrentUser,
    Form(form): Form<UpdateProfileForm>,
) -> Result<Success<SessionResponse>, Error> {
    let (Some(username), Some(email)) = (required(form.username), required(form.email)) else {
        return Err(Error::bad_request("Username and email are required"));
    };

    let password_hash = match required(form.new_password) {
        Some(new_password) => {
            let Some(current_password) = required(form.current_password) else {
                return Err(Error::bad_request(
                    "Current password is required to set a new password",
                ));
            };

            if new_password.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(Error::bad_request(format!(
                    "New password must be at least {MIN_PASSWORD_LENGTH} characters"
                )));
            }

            if !password::verify(&current_user.password_hash, &current_password) {
                return Err(Error::unauthorized("Current password is incorrect"));
            }

            Some(hash_password(&new_password)?)
        }
        None => None,
    };

    ensure_unique_user(&database, &username, &email, Some(&current_user.id)).await?;

    let user = database
        .update_user(
            &current_user,
            &UpdateUserValues {
                username: &username,
                email: &email,
                password_hash: password_hash.as_deref(),
            },
        )
        .await
        .map_err(Error::database_or_conflict("Username or email already exists"))?
        .ok_or_else(|| Error::not_found("User not found"))?;

    Ok(Success::ok(SessionResponse::new(
        &jwt_keys,
        "Profile updated",
        &user,
    )?))
}

#[derive(Deserialize)]
pub struct DeleteAccountForm {
    password: Option<String>,
}

pub async fn delete_me(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    Form(form): Form<DeleteAccountForm>,
) -> Result<Success<Message>, Error> {
    let Some(password) = required(form.password) else {
        return Err(Error::bad_request("Password is required to delete the account"));
    };

    if !password::verify(&current_user.password_hash, &password) {
        return Err(Error::unauthorized("Password is incorrect"));
    }

    let deleted = database
        .delete_user(&current_user)
        .await
        .map_err(Error::database)?;

    if !deleted {
        return Err(Error::not_found("User not found"));
    }

    tracing::info!("Deleted user {} ({})", current_user.username, current_user.id);

    Ok(Success::message("Account deleted"))
}

/// Fail when the username or email is already used by another user, naming which one
async fn ensure_unique_user(
    database: &Database,
    username: &str,
    email: &str,
    except: Option<&Uuid>,
) -> Result<(), Error> {
    let conflicting_user = database
        .find_conflicting_user(username, email, except)
        .await
        .map_err(Error::database)?;

    match conflicting_user {
        Some(user) if user.username == username => Err(Error::conflict("Username already exists")),
        Some(_) => Err(Error::conflict("Email already exists")),
        None => Ok(()),
    }
}

fn hash_password(password: &str) -> Result<String, Error> {
    password::hash(password).map_err(|err| {
        tracing::error!("Could not hash password: {err}");

        Error::internal_server_error("Could not hash password")
    })
}
