//! Authentication domain types

mod types;

pub use types::{
    AuthError, AuthResponse, ChangePasswordRequest, CredentialKey, LoginRequest, RefreshRequest,
    RefreshResponse, RegisterRequest, SessionUser, TokenPair, token_preview,
};
