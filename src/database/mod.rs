pub mod manager;
pub mod models;
pub mod postgres;
pub mod querier;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgQuerier;
pub use querier::{
    CreatePostParams, CreateUserParams, ListPostsParams, Querier, StoreError, UpdatePostParams,
};
