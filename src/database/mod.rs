pub mod advertisements;
pub mod models;
pub mod pool;
pub mod session;
pub mod users;

pub use pool::DatabaseError;
pub use session::Session;
