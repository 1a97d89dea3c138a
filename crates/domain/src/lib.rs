pub mod branding;
pub mod coerce;
pub mod counters;
pub mod csv;
pub mod error;
pub mod generate;
pub mod plan;
pub mod ports;
pub mod product;
pub mod profile;
pub mod reminders;
pub mod seed;
pub mod store;
pub mod util;

pub type DomainResult<T> = Result<T, error::DomainError>;
