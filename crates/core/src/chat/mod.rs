pub mod intent;
pub mod responder;
pub mod session;
