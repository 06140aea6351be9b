pub mod capture;
pub mod probe;
pub mod source;
