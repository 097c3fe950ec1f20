use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    /// The account/subscriber store could not answer an existence query.
    #[error("Directory lookup failed: {0}")]
    Lookup(String),
}
