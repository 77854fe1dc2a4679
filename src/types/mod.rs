use thiserror::Error;

mod domain_types;
mod ids;
mod object_type;

pub use domain_types::*;
pub use ids::*;
pub use object_type::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid organization name: {name} - {reason}")]
    InvalidOrganization { name: String, reason: String },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid object id: {0}")]
    InvalidId(String),
}
