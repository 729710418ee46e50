#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SubscriberStatus {
    Subscribed,
    Unsubscribed,
}

impl SubscriberStatus {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, SubscriberStatus::Subscribed)
    }

    pub fn parse(status: &str) -> Result<SubscriberStatus, String> {
        match status {
            "subscribed" => Ok(SubscriberStatus::Subscribed),
            "unsubscribed" => Ok(SubscriberStatus::Unsubscribed),
            _ => Err(format!("{} is not a valid subscriber status", status)),
        }
    }
}

impl AsRef<str> for SubscriberStatus {
    fn as_ref(&self) -> &str {
        match self {
            SubscriberStatus::Subscribed => "subscribed",
            SubscriberStatus::Unsubscribed => "unsubscribed",
        }
    }
}
