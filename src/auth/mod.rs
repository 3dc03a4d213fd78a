// Authentication module
// Token storage, the dedicated refresh call, and session operations

mod refresh;
mod session;
mod store;
mod types;

pub use refresh::refresh_access_token;
pub use store::{MemoryTokenStore, SqliteTokenStore, TokenStore};
pub use types::{AuthSession, ChangePasswordRequest, LoginRequest, RefreshedToken};
