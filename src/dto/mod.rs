pub mod bid_response;
pub mod envelope;
pub mod registration;
