use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub source: Option<String>,
}

#[derive(Deserialize)]
pub struct SubscribeBody {
    // A missing email is reported like an invalid one
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Deserialize)]
pub struct UnsubscribeBody {
    #[serde(default)]
    pub email: String,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email)?;

        Ok(NewSubscriber {
            email,
            source: body.source,
        })
    }
}

impl TryFrom<UnsubscribeBody> for SubscriberEmail {
    type Error = String;

    fn try_from(body: UnsubscribeBody) -> Result<Self, Self::Error> {
        SubscriberEmail::parse(body.email)
    }
}
