use serde::{Deserialize, Serialize};

/// Backing storage: rows of string cells.
pub type Grid = Vec<Vec<String>>;

/// Declared size of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

/// The part of the grid that is shown and persisted.
///
/// Always within the physical extents of the grid it describes. May be
/// smaller than the grid after a shrink; the hidden cells come back when
/// the table grows again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Window {
    pub rows: usize,
    pub cols: usize,
}

impl Window {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl From<Dimensions> for Window {
    fn from(dims: Dimensions) -> Self {
        Self { rows: dims.rows, cols: dims.cols }
    }
}

/// The persisted entity, in the document store's field names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Empty string marks a new, unsaved table.
    #[serde(rename = "tableName", default)]
    pub name: String,

    #[serde(default)]
    pub dimensions: Dimensions,

    #[serde(rename = "table", default)]
    pub grid: Grid,

    /// Assigned by the backend on first save.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Table {
    /// A blank "new table": no name, 0x0, no cells.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.name.is_empty()
    }

    /// Cell at `(row, col)` of the backing grid, if it exists.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.grid.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}

/// Share permission granted to other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    ReadOnly,
    Edit,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::ReadOnly => write!(f, "read-only"),
            ViewMode::Edit => write!(f, "edit"),
        }
    }
}

/// Summary of a table visible to the current user (owned or shared).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTable {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "tableName")]
    pub name: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub permissions: ViewMode,
}

/// Which `UserTable` field a lookup compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTableField {
    Id,
    Name,
    Owner,
}

impl UserTable {
    pub fn field(&self, field: UserTableField) -> Option<&str> {
        match field {
            UserTableField::Id => self.id.as_deref(),
            UserTableField::Name => Some(&self.name),
            UserTableField::Owner => Some(&self.owner),
        }
    }
}

/// Body of a share request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    #[serde(rename = "tableId")]
    pub table_id: String,

    pub users: Vec<String>,

    #[serde(rename = "viewMode")]
    pub view_mode: ViewMode,
}
