//! Property listings and contact inquiries.
//!
//! Records live in two store collections (`properties`, `contact_messages`).
//! The router only ever sees typed records: the service maps documents through
//! [`records`], which strips the store identifier and normalizes timestamps.

pub mod domain;
pub mod records;
pub mod router;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ContactMessage, ContactMessageCreate, ContactMessageId, Property, PropertyCreate, PropertyId,
    PropertyStatus, CONTACT_MESSAGES, LIST_LIMIT, PROPERTIES,
};
pub use records::RecordError;
pub use router::listing_router;
pub use seed::{sample_properties, SeedOutcome};
pub use service::{ListingService, ListingServiceError};
