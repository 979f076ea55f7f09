pub mod error;
pub mod ident;
pub mod model;
pub mod schema;
pub mod storage;
pub mod store;
