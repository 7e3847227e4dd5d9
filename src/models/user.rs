//! Authenticated user, roles and login payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::table::{FieldValue, Row};

/// Roles allowed into the admin tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Library staff
    Personal,
    Estudiante,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Personal => "personal",
            Role::Estudiante => "estudiante",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Role::Personal),
            "estudiante" => Ok(Role::Estudiante),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// User profile returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub id: String,
    pub nombre: String,
    /// Raw role string; see [`User::role`]
    pub tipo_usuario: String,
    pub email: String,
}

impl User {
    /// Parsed role, `None` for roles the admin tool does not know
    pub fn role(&self) -> Option<Role> {
        self.tipo_usuario.parse().ok()
    }
}

impl Row for User {
    fn field_names(&self) -> Vec<&str> {
        vec!["id", "nombre", "tipo_usuario", "email"]
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "nombre" => Some(self.nombre.as_str().into()),
            "tipo_usuario" => Some(self.tipo_usuario.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            _ => None,
        }
    }
}

/// Body of `POST {auth_base}/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Login form, validated before any request is sent
#[derive(Debug, Clone, Validate)]
pub struct LoginForm {
    #[validate(
        length(min = 1, message = "El email es obligatorio"),
        email(message = "Formato de email inválido")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl From<LoginForm> for LoginRequest {
    fn from(form: LoginForm) -> Self {
        LoginRequest {
            email: form.email,
            password: form.password,
        }
    }
}
