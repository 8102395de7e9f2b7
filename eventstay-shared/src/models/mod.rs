pub mod booking;
pub mod enrollment;
pub mod session;
pub mod ticket;

pub use booking::{Booking, BookingWithRoom, Room};
pub use enrollment::{Address, Enrollment};
pub use session::Session;
pub use ticket::{Ticket, TicketStatus, TicketType, TicketWithType};
