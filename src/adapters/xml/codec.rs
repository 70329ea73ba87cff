//! XML encoding of project records.
//!
//! Documents look like:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <Project>
//!   <Name>Solar Farm</Name>
//!   <Description>789 Desert Ave, Las Vegas, NV 89123</Description>
//!   <Location>789 Desert Ave, Las Vegas, NV 89123</Location>
//!   <IsStarred>true</IsStarred>
//!   <CreatedDate>2024-03-01T17:30:00.123Z</CreatedDate>
//!   <LastModifiedDate>2024-03-02T08:00:00Z</LastModifiedDate>
//!   <Latitude>36.1</Latitude>
//!   <Longitude>-115.1</Longitude>
//! </Project>
//! ```
//!
//! Missing elements take their defaults; unknown elements and root
//! attributes are ignored. String values are read verbatim, while booleans,
//! numbers and dates may be padded with whitespace.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use super::ProjectXmlDto;
use crate::domain::Project;

pub const ROOT_ELEMENT: &str = "Project";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XmlCodecError {
    #[error("{0}")]
    Malformed(String),

    #[error("Failed to encode project: {0}")]
    Encode(String),
}

pub type XmlCodecResult<T> = Result<T, XmlCodecError>;

pub fn encode(project: &Project) -> XmlCodecResult<String> {
    let dto = ProjectXmlDto::from(project);

    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    dto.serialize(serializer)
        .map_err(|e| XmlCodecError::Encode(e.to_string()))?;

    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

pub fn decode(document: &str) -> XmlCodecResult<Project> {
    let elements = read_elements(document)?;
    ProjectXmlDto::from_elements(&elements)?.into_project()
}

fn malformed(e: impl std::fmt::Display) -> XmlCodecError {
    XmlCodecError::Malformed(e.to_string())
}

/// Text of every direct child of the `<Project>` root, keyed by element name.
///
/// Text is kept byte-for-byte: free-text fields may start or end with
/// whitespace. Markup nested inside a child is skipped.
fn read_elements(document: &str) -> XmlCodecResult<HashMap<String, String>> {
    let mut reader = Reader::from_str(document);
    let mut elements = HashMap::new();
    let mut current: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                match depth {
                    0 => check_root(&name)?,
                    1 => current = Some((name, String::new())),
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                match depth {
                    0 => {
                        check_root(&name)?;
                        return Ok(elements);
                    }
                    1 => {
                        elements.insert(name, String::new());
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    0 => return Ok(elements),
                    1 => {
                        if let Some((name, text)) = current.take() {
                            elements.insert(name, text);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => match depth {
                0 if !text.iter().all(u8::is_ascii_whitespace) => {
                    return Err(XmlCodecError::Malformed(format!(
                        "missing <{ROOT_ELEMENT}> root element"
                    )));
                }
                2 => {
                    if let Some((_, value)) = current.as_mut() {
                        value.push_str(&text.unescape().map_err(malformed)?);
                    }
                }
                _ => {}
            },
            Event::CData(data) if depth == 2 => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof if depth == 0 => {
                return Err(XmlCodecError::Malformed(format!(
                    "missing <{ROOT_ELEMENT}> root element"
                )));
            }
            Event::Eof => {
                return Err(XmlCodecError::Malformed(format!(
                    "unexpected end of document inside <{ROOT_ELEMENT}>"
                )));
            }
            _ => {}
        }
    }
}

fn check_root(name: &str) -> XmlCodecResult<()> {
    if name == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(XmlCodecError::Malformed(format!(
            "expected <{ROOT_ELEMENT}> root element, found <{name}>"
        )))
    }
}
