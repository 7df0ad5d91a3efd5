mod email_address;
mod ids;
mod subscriber;
mod subscriber_email;
mod subscriber_name;

pub use email_address::{EmailAddress, EmailAddressWithSubscriber};
pub use ids::{EmailAddressId, SubscriberId};
pub use subscriber::Subscriber;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
