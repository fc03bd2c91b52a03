use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RowsResponse<T> {
    pub rows: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    pub rows: Vec<T>,

    #[serde(rename = "totalRows", default)]
    pub total_rows: Option<u64>,
}
