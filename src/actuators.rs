#[cfg(any(feature = "chat-in", feature = "chat-out"))]
pub mod chat;

#[cfg(feature = "speech")]
pub mod speech;
