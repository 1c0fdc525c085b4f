mod errors;
mod password;
mod storage;
mod types;

pub use errors::{UserError, UserKey};
pub use password::{PasswordHash, hash_password, verify_password};
pub use storage::UserStore;
pub use types::{User, UserSearchField};
