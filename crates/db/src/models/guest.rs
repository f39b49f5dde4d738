//! The guest record served by single-id lookups.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the mirrored guest table.
///
/// Field order and serialized keys follow the spreadsheet header. Only
/// `ID` is required; every other column may be SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Guest {
    #[sqlx(rename = "ID")]
    #[serde(rename = "ID")]
    pub id: String,
    #[sqlx(rename = "SEX")]
    #[serde(rename = "SEX")]
    pub sex: Option<String>,
    #[sqlx(rename = "APELLIDOS")]
    #[serde(rename = "APELLIDOS")]
    pub last_name: Option<String>,
    #[sqlx(rename = "NOMBRES")]
    #[serde(rename = "NOMBRES")]
    pub first_name: Option<String>,
    #[sqlx(rename = "NUMBER_GUEST")]
    #[serde(rename = "NUMBER_GUEST")]
    pub party_size: Option<String>,
    #[sqlx(rename = "MESA")]
    #[serde(rename = "MESA")]
    pub table_number: Option<String>,
    #[sqlx(rename = "CELULAR")]
    #[serde(rename = "CELULAR")]
    pub phone: Option<String>,
    #[sqlx(rename = "CONFIRMADO")]
    #[serde(rename = "CONFIRMADO")]
    pub confirmed: Option<String>,
}

impl Guest {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
