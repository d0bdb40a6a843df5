pub mod mode;
pub mod pack;
pub mod request;
