mod data_store;
mod schema_validation;

pub(crate) use data_store::{DB_TABLE_PREFIX, GENERIC_DATA_STORE};

pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
