pub mod handlers;
pub mod payload;
pub mod ratelimit;
pub mod transport;
pub mod view;

pub use handlers::{dispatch, Deps, Outcome};
pub use payload::Action;
pub use ratelimit::RateLimiter;
pub use transport::{ChatTransport, TelegramTransport};
pub use view::View;

#[cfg(test)]
pub use transport::MockChatTransport;
