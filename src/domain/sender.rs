use super::subscriber_email::SubscriberEmail;

/// Who outgoing mail claims to come from.
#[derive(Debug, Clone)]
pub struct Sender {
    name: String,
    address: SubscriberEmail,
}

impl Sender {
    pub fn new(name: String, address: SubscriberEmail) -> Self {
        Self { name, address }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &SubscriberEmail {
        &self.address
    }

    /// `Name <address>`, the mailbox form most email APIs accept in `from`.
    pub fn mailbox(&self) -> String {
        format!("{} <{}>", self.name, self.address)
    }
}
