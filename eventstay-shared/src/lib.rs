pub mod models;
pub mod pii;

pub use models::{
    Address, Booking, BookingWithRoom, Enrollment, Room, Session, Ticket, TicketStatus,
    TicketType, TicketWithType,
};
pub use pii::Masked;
