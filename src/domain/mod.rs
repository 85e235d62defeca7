mod new_subscriber;
mod sender;
mod subscriber_email;
mod welcome_email;

pub use new_subscriber::NewSubscriber;
pub use sender::Sender;
pub use subscriber_email::SubscriberEmail;
pub use welcome_email::WelcomeEmail;
