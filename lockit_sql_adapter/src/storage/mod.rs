mod data_store;
mod errors;
mod schema_validation;

pub(crate) use data_store::{DataStore, DataStoreKind, connect_data_store};
pub(crate) use errors::StorageError;
pub(crate) use schema_validation::{
    validate_mysql_table_schema, validate_postgres_table_schema, validate_sqlite_table_schema,
    validate_table_name,
};
