pub mod test_server;

pub use test_server::{TestServer, reject_inserts_for, unique_clerk_id, user_event};
