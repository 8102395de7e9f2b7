use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pii::Masked;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i32,
    pub name: String,
    pub cpf: Masked<String>,
    pub birthday: DateTime<Utc>,
    pub phone: Masked<String>,
    pub user_id: i32,
    #[serde(rename = "Address")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i32,
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    pub address_detail: Option<String>,
    pub enrollment_id: i32,
}
