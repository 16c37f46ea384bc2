pub mod dto;

#[cfg(feature = "chat-in")]
pub mod back;

#[cfg(feature = "chat-out")]
pub mod client;
