/// sqlite implementation of the record store
pub mod sqlite_record_store;
