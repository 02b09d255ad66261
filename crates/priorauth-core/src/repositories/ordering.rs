//! Sort options accepted by list queries

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy<F> {
    pub field: F,
    #[serde(default)]
    pub direction: SortDirection,
}

impl<F> OrderBy<F> {
    pub fn asc(field: F) -> Self {
        Self { field, direction: SortDirection::Asc }
    }

    pub fn desc(field: F) -> Self {
        Self { field, direction: SortDirection::Desc }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
}

impl CaseSortField {
    pub fn column(&self) -> &'static str {
        match self {
            CaseSortField::CreatedAt => "created_at",
            CaseSortField::UpdatedAt => "updated_at",
            // Text ranks would sort alphabetically
            CaseSortField::Priority => {
                "CASE priority WHEN 'low' THEN 0 WHEN 'normal' THEN 1 WHEN 'high' THEN 2 ELSE 3 END"
            }
            CaseSortField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSortField {
    #[default]
    CreatedAt,
    DueAt,
    Status,
}

impl TaskSortField {
    pub fn column(&self) -> &'static str {
        match self {
            TaskSortField::CreatedAt => "created_at",
            TaskSortField::DueAt => "due_at",
            TaskSortField::Status => "status",
        }
    }
}

pub type CaseOrder = OrderBy<CaseSortField>;
pub type TaskOrder = OrderBy<TaskSortField>;
