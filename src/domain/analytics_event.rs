use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::record_store::{CosmicObject, NewObject};

pub const ANALYTICS_EVENT_OBJECT_TYPE: &str = "analytics-events";
const RECENT_EVENTS_LIMIT: usize = 10;
const UNKNOWN_EVENT_TYPE: &str = "unknown";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventBody {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_data: Value,
    #[serde(default)]
    pub page_url: Option<String>,
}

#[derive(Debug)]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub event_data: Value,
    pub page_url: Option<String>,
    pub user_agent: String,
}

impl NewAnalyticsEvent {
    pub fn parse(body: TrackEventBody, user_agent: Option<&str>) -> Result<Self, String> {
        if body.event_type.trim().is_empty() {
            return Err(String::from("Event type is required"));
        }

        Ok(NewAnalyticsEvent {
            event_type: body.event_type,
            event_data: body.event_data,
            page_url: body.page_url,
            user_agent: user_agent.unwrap_or_default().to_string(),
        })
    }

    pub fn into_object(self, recorded_at: DateTime<Utc>) -> NewObject {
        let timestamp = recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        NewObject::new(
            ANALYTICS_EVENT_OBJECT_TYPE,
            format!("{} - {}", self.event_type, timestamp),
            json!({
                "event_type": self.event_type,
                // Stored as a JSON encoded string
                "event_data": self.event_data.to_string(),
                "page_url": self.page_url,
                "timestamp": timestamp,
                "user_agent": self.user_agent,
            }),
        )
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    pub recent_events: Vec<RecentEvent>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub timestamp: Option<String>,
    pub page_url: Option<String>,
}

impl AnalyticsStats {
    /// Aggregates events in the order the backend returned them.
    pub fn from_events(events: &[CosmicObject]) -> Self {
        let mut events_by_type = BTreeMap::new();

        for event in events {
            let event_type = event
                .metadata_str("event_type")
                .filter(|event_type| !event_type.is_empty())
                .unwrap_or(UNKNOWN_EVENT_TYPE);

            *events_by_type.entry(event_type.to_string()).or_insert(0) += 1;
        }

        let recent_events = events
            .iter()
            .take(RECENT_EVENTS_LIMIT)
            .map(|event| RecentEvent {
                id: event.id.clone(),
                event_type: event.metadata_str("event_type").map(String::from),
                timestamp: event.metadata_str("timestamp").map(String::from),
                page_url: event.metadata_str("page_url").map(String::from),
            })
            .collect();

        AnalyticsStats {
            total_events: events.len(),
            events_by_type,
            recent_events,
        }
    }
}
