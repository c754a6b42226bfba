//! Wire types shared by providers and the dispatcher

pub mod request;
pub mod response;
