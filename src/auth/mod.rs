//! Administrator authentication.
//!
//! Password hashing, session tokens, two-factor codes, the permission tree
//! and the session flows built on top of them.

pub mod identity;
mod password;
pub mod permission;
pub mod session;
pub mod token;
pub mod two_factor;
pub mod validation;

pub use identity::AdminIdentity;
pub use password::{hash_password, verify_password, PasswordError};
pub use permission::{build_menu_tree, MenuNode};
pub use session::{
    authorize, ActionOutcome, AdminInfo, LoginAttempt, LoginOutcome, SessionError, SessionService,
    SessionSettings, SessionStore,
};
pub use token::{SessionClaims, SubjectKind, TokenError, TokenService, TOKEN_TTL_SECS};
pub use two_factor::TwoFactorError;
pub use validation::ValidationError;
