use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for the profile rename.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// `data` payload returned on signup.
#[derive(Debug, Serialize)]
pub struct SignupData {
    pub user: CreatedUser,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: Uuid,
    pub name: String,
}

/// `data` payload returned on login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub name: String,
}

/// `data` payload for the profile read.
#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: ProfileUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub name: String,
    pub email: String,
}
