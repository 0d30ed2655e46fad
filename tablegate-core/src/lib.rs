//! Tablegate Core - Types and Filter Compilation
//!
//! Pure data structures and pure functions shared by the client crates:
//! the typed filter model and its compiler, column type inference, table
//! schema descriptors, the REST response envelope, and saved connection
//! records. Nothing here performs I/O.

pub mod connection;
pub mod enums;
pub mod error;
pub mod filter;
pub mod inference;
pub mod query;
pub mod response;
pub mod scalar;
pub mod schema;

pub use connection::{new_connection_id, ConnectionRecord, ConnectionUpdate, NewConnection};
pub use enums::{DateKind, FieldType, NumericKind, NumericOperator};
pub use error::{FilterError, FilterResult};
pub use filter::{compile_filters, FilterCondition, FilterSpec, RawCondition};
pub use inference::infer_type;
pub use query::{ListQuery, QueryParamSet, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use response::{ApiEnvelope, BackendError, ListPage, RecordId, Row};
pub use scalar::Scalar;
pub use schema::{FieldDescriptor, FieldInfo, FieldsResponse, SchemaSource, TableSchema};
