use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Issued but not paid yet.
    Reserved,
    Paid,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Reserved => f.write_str("RESERVED"),
            TicketStatus::Paid => f.write_str("PAID"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESERVED" => Ok(TicketStatus::Reserved),
            "PAID" => Ok(TicketStatus::Paid),
            other => Err(format!("unknown ticket status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub is_remote: bool,
    pub includes_hotel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i32,
    pub ticket_type_id: i32,
    pub enrollment_id: i32,
    pub status: TicketStatus,
}

/// A ticket together with its type, as the eligibility rules need both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketWithType {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(rename = "TicketType")]
    pub ticket_type: TicketType,
}

impl TicketWithType {
    /// In-person, paid, with hotel accommodation.
    pub fn grants_hotel(&self) -> bool {
        self.ticket.status == TicketStatus::Paid
            && !self.ticket_type.is_remote
            && self.ticket_type.includes_hotel
    }
}
