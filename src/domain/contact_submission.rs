use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::domain::email_address::EmailAddress;
use crate::record_store::NewObject;

pub const CONTACT_SUBMISSION_OBJECT_TYPE: &str = "contact-submissions";

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ContactBody {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
}

pub struct NewContactSubmission {
    pub name: String,
    pub email: EmailAddress,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
}

impl TryFrom<ContactBody> for NewContactSubmission {
    type Error = String;

    fn try_from(body: ContactBody) -> Result<Self, Self::Error> {
        let is_missing_field = [&body.name, &body.email, &body.subject, &body.message]
            .iter()
            .any(|field| field.trim().is_empty());

        if is_missing_field {
            return Err(String::from("Missing required fields"));
        }

        Ok(NewContactSubmission {
            email: EmailAddress::parse(body.email)?,
            name: body.name,
            company: body.company,
            subject: body.subject,
            message: body.message,
        })
    }
}

impl NewContactSubmission {
    pub fn into_object(self, submitted_on: NaiveDate) -> NewObject {
        NewObject::new(
            CONTACT_SUBMISSION_OBJECT_TYPE,
            format!("Contact from {}", self.name),
            json!({
                "name": self.name,
                "email": self.email.as_ref(),
                "company": self.company.unwrap_or_default(),
                "subject": self.subject,
                "message": self.message,
                "status": "New",
                "submission_date": submitted_on.format("%Y-%m-%d").to_string(),
            }),
        )
    }
}
