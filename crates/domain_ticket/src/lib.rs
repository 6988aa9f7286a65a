//! Ticket domain - operations against the CRM's ticket object type

pub mod ops;

pub use ops::{
    create_ticket, delete_ticket_by_id, get_ticket_by_id, get_tickets, update_ticket_by_id,
    CreateTicketParams, GetTicketsParams, UpdateTicketParams,
};
