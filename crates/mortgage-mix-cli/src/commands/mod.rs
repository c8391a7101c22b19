pub mod loan;
pub mod mix;
