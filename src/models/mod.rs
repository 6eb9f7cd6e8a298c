pub mod hh;
pub mod posting;
