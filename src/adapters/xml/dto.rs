use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::{XmlCodecError, XmlCodecResult};
use crate::domain::Project;

// On-disk schema. One element per attribute under a single <Project> root;
// the backing file path is never written.
#[derive(Debug, Serialize)]
#[serde(rename = "Project")]
pub struct ProjectXmlDto {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "IsStarred")]
    pub is_starred: bool,
    #[serde(rename = "CreatedDate")]
    pub created_date: Option<String>,
    #[serde(rename = "LastModifiedDate")]
    pub last_modified_date: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl From<&Project> for ProjectXmlDto {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            location: project.location.clone(),
            is_starred: project.is_starred,
            created_date: Some(format_timestamp(&project.created_date)),
            last_modified_date: Some(format_timestamp(&project.last_modified_date)),
            latitude: project.latitude,
            longitude: project.longitude,
        }
    }
}

impl ProjectXmlDto {
    /// Build from the child elements of a `<Project>` document. Free-text
    /// values are kept exactly as written; absent elements take defaults.
    pub fn from_elements(elements: &HashMap<String, String>) -> XmlCodecResult<Self> {
        let text = |element: &str| elements.get(element).cloned().unwrap_or_default();

        Ok(Self {
            name: text("Name"),
            description: text("Description"),
            location: text("Location"),
            is_starred: parse_bool("IsStarred", elements.get("IsStarred"))?,
            created_date: elements.get("CreatedDate").cloned(),
            last_modified_date: elements.get("LastModifiedDate").cloned(),
            latitude: parse_f64("Latitude", elements.get("Latitude"))?,
            longitude: parse_f64("Longitude", elements.get("Longitude"))?,
        })
    }

    pub fn into_project(self) -> XmlCodecResult<Project> {
        let created_date = parse_optional_timestamp("CreatedDate", self.created_date.as_deref())?;
        let last_modified_date =
            parse_optional_timestamp("LastModifiedDate", self.last_modified_date.as_deref())?;

        Ok(Project {
            name: self.name,
            description: self.description,
            location: self.location,
            is_starred: self.is_starred,
            created_date,
            last_modified_date,
            latitude: self.latitude,
            longitude: self.longitude,
            file_path: None,
        })
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Accepts RFC 3339 with any offset, or a bare local-less timestamp which is
/// read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_optional_timestamp(element: &str, value: Option<&str>) -> XmlCodecResult<DateTime<Utc>> {
    match value.map(str::trim) {
        None | Some("") => Ok(DateTime::<Utc>::UNIX_EPOCH),
        Some(text) => parse_timestamp(text).ok_or_else(|| {
            XmlCodecError::Malformed(format!("<{element}> is not a timestamp: {text:?}"))
        }),
    }
}

fn parse_bool(element: &str, value: Option<&String>) -> XmlCodecResult<bool> {
    match value.map(|v| v.trim()) {
        None | Some("") | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(text) => Err(XmlCodecError::Malformed(format!(
            "<{element}> is not a boolean: {text:?}"
        ))),
    }
}

fn parse_f64(element: &str, value: Option<&String>) -> XmlCodecResult<f64> {
    match value.map(|v| v.trim()) {
        None | Some("") => Ok(0.0),
        Some(text) => text.parse().map_err(|_| {
            XmlCodecError::Malformed(format!("<{element}> is not a number: {text:?}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_with_offset() {
        let parsed = parse_timestamp("2024-03-01T09:30:00.1234567-08:00").unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 17, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_700);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_timestamp_without_offset_is_utc() {
        let parsed = parse_timestamp("2024-03-01T09:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_missing_dates_fall_back_to_epoch() {
        let dto = ProjectXmlDto {
            name: "Old".to_string(),
            description: String::new(),
            location: String::new(),
            is_starred: false,
            created_date: None,
            last_modified_date: Some(String::new()),
            latitude: 0.0,
            longitude: 0.0,
        };

        let project = dto.into_project().unwrap();
        assert_eq!(project.created_date, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(project.last_modified_date, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_from_elements_keeps_text_verbatim() {
        let elements = HashMap::from([
            ("Name".to_string(), "  Padded Name  ".to_string()),
            ("Location".to_string(), " ".to_string()),
            ("IsStarred".to_string(), " 1 ".to_string()),
            ("Longitude".to_string(), "\n-115.1\n".to_string()),
        ]);

        let dto = ProjectXmlDto::from_elements(&elements).unwrap();

        assert_eq!(dto.name, "  Padded Name  ");
        assert_eq!(dto.description, "");
        assert_eq!(dto.location, " ");
        assert!(dto.is_starred);
        assert_eq!(dto.latitude, 0.0);
        assert_eq!(dto.longitude, -115.1);
    }

    #[test]
    fn test_from_elements_rejects_bad_values() {
        let starred = HashMap::from([("IsStarred".to_string(), "yes".to_string())]);
        assert!(matches!(
            ProjectXmlDto::from_elements(&starred),
            Err(XmlCodecError::Malformed(_))
        ));

        let latitude = HashMap::from([("Latitude".to_string(), "north".to_string())]);
        assert!(matches!(
            ProjectXmlDto::from_elements(&latitude),
            Err(XmlCodecError::Malformed(_))
        ));
    }
}
