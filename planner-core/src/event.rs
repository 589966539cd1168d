//! Event and attachment types.
//!
//! Field names serialize camelCase (`startTime`, `endTime`) and `date` as
//! `YYYY-MM-DD`, matching the JSON payloads already persisted by earlier
//! versions of the app. Times are `HH:mm` wall-clock strings with no
//! timezone; the core does not require `start_time <= end_time` (known gap,
//! kept rather than silently fixed).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A calendar-bound schedule event, owned by exactly one user.
///
/// The unit of persistence is the user's full event collection, not the
/// individual event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Calendar-day key; no time-of-day component.
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub color: EventColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl CourseEvent {
    /// Attachments slice, empty when none are stored.
    pub fn attachments(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or_default()
    }
}

/// A file or link attached to an event. Lives and dies with its owner:
/// deleting the event drops its attachments, there is no separate ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// URL for links, or a self-contained encoded payload / path for files.
    pub path: String,
    /// Size in bytes; files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    File,
    Link,
}

/// Symbolic color tag from the fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Gray,
}

impl EventColor {
    pub const ALL: [EventColor; 6] = [
        EventColor::Red,
        EventColor::Blue,
        EventColor::Green,
        EventColor::Orange,
        EventColor::Purple,
        EventColor::Gray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Red => "red",
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Orange => "orange",
            EventColor::Purple => "purple",
            EventColor::Gray => "gray",
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventColor::ALL
            .iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown color '{}' (expected one of: red, blue, green, orange, purple, gray)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> CourseEvent {
        CourseEvent {
            id: "ev-1".to_string(),
            title: "Calc I".to_string(),
            location: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            color: EventColor::Red,
            attachments: None,
        }
    }

    #[test]
    fn serializes_with_original_field_names() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "10:30");
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["color"], "red");
        // Absent optionals are omitted entirely, not serialized as null
        assert!(json.get("location").is_none());
        assert!(json.get("attachments").is_none());
    }

    #[test]
    fn deserializes_previously_stored_payload() {
        let raw = r#"{
            "id": "abc",
            "title": "Physics Lab",
            "location": "Building 4",
            "date": "2024-02-29",
            "startTime": "13:00",
            "endTime": "16:00",
            "color": "blue",
            "attachments": [
                {"id": "a1", "name": "syllabus.pdf", "type": "file", "path": "data:application/pdf;base64,xyz", "size": 1024},
                {"id": "a2", "name": "Course page", "type": "link", "path": "https://example.edu/phys"}
            ]
        }"#;

        let event: CourseEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(event.attachments().len(), 2);
        assert_eq!(event.attachments()[0].kind, AttachmentKind::File);
        assert_eq!(event.attachments()[0].size, Some(1024));
        assert_eq!(event.attachments()[1].kind, AttachmentKind::Link);
        assert_eq!(event.attachments()[1].size, None);
    }

    #[test]
    fn roundtrips_through_json() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: CourseEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn color_parses_from_str() {
        assert_eq!("red".parse::<EventColor>().unwrap(), EventColor::Red);
        assert_eq!("Purple".parse::<EventColor>().unwrap(), EventColor::Purple);
        assert!("mauve".parse::<EventColor>().is_err());
    }
}
