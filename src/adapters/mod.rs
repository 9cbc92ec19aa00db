pub mod postgres;
pub mod warehouse;

pub use postgres::PgSalesDatabase;
pub use warehouse::HttpDocumentSink;
