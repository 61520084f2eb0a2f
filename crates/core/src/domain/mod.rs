pub mod instrument;
pub mod message;
pub mod price;
