//! Orchestration services for the identity context.

mod auth;
mod directory;
mod token;

pub use auth::{AuthService, AuthServiceError, AuthServiceResult, AuthSession};
pub use directory::{
    CreateUserRequest, DirectoryServiceError, DirectoryServiceResult, UserDirectoryService,
};
pub use token::{TokenError, TokenPair, TokenService};
