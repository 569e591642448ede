// Adapters layer: concrete implementations of the domain ports (page, terminal, http relay, chat).

pub mod chat;
pub mod page;
pub mod relay;
pub mod terminal;
