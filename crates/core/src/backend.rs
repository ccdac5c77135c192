//! Seam to the table backend.
//!
//! Request/response only. Transport, auth and timeouts belong to the
//! implementor (see the hub client crate).

use crate::table::{ShareRequest, Table, UserTable};

pub trait TableBackend {
    /// Failure of a single request. Its `Display` text is what the user sees.
    type Error: std::error::Error;

    /// Tables owned by or shared with the current user.
    fn list_user_tables(&self) -> Result<Vec<UserTable>, Self::Error>;

    /// Full table by name.
    fn fetch_table(&self, name: &str) -> Result<Table, Self::Error>;

    /// Create or update a table. Returns the stored record.
    fn save_table(&self, table: &Table) -> Result<Table, Self::Error>;

    fn share_table(&self, request: &ShareRequest) -> Result<(), Self::Error>;

    /// Exported file contents for a table.
    fn download_table(&self, name: &str) -> Result<Vec<u8>, Self::Error>;
}
