pub mod aggregate;
pub mod track;
