/// Database utilities
///
/// - `pool`: SQLite connection pool management
/// - `schema`: Table creation and bootstrap-admin seeding

pub mod pool;
pub mod schema;
