mod errors;
mod storage;
mod types;

pub use errors::UserError;
pub use storage::UserStore;
pub use types::{User, UserProfile};

#[cfg(test)]
pub(crate) use storage::DB_TABLE_USERS;

pub(crate) async fn init() -> Result<(), UserError> {
    UserStore::init().await
}
