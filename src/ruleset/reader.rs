//! Ruleset document parsing
//!
//! Reads an existing engine ruleset, with or without the ruleset namespace,
//! back into a [`RuleSet`]. Elements that carry no configuration (examples,
//! exclude patterns, rule descriptions) are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::model::{RuleProperty, RuleSet, RuleSetRule};
use crate::error::RuleSetError;
use crate::utils::xml::{self, XmlError};

/// Parse a ruleset document
pub fn parse(document: &str) -> Result<RuleSet, RuleSetError> {
    parse_document(document).map_err(|e| RuleSetError::Parse(e.to_string()))
}

fn parse_document(document: &str) -> Result<RuleSet, XmlError> {
    let mut reader = xml::reader(document);
    let mut ruleset = RuleSet::default();
    let mut found_root = false;

    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::Start(e) => match xml::local_name(&e).as_str() {
                "ruleset" if !found_root => {
                    found_root = true;
                    ruleset.name = xml::attribute(&e, "name").unwrap_or_default();
                }
                "description" if found_root => {
                    ruleset.description = Some(xml::read_text(&mut reader)?.trim().to_string());
                }
                "rule" if found_root => ruleset.rules.push(read_rule(&mut reader, &e)?),
                _ => xml::skip(&mut reader, &e)?,
            },
            Event::Empty(e) => match xml::local_name(&e).as_str() {
                "ruleset" if !found_root => {
                    found_root = true;
                    ruleset.name = xml::attribute(&e, "name").unwrap_or_default();
                }
                "rule" if found_root => ruleset.rules.push(rule_attributes(&e)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !found_root {
        return Err(XmlError::Malformed("missing <ruleset> root element".to_string()));
    }
    Ok(ruleset)
}

fn rule_attributes(e: &BytesStart<'_>) -> RuleSetRule {
    RuleSetRule {
        reference: xml::attribute(e, "ref"),
        class: xml::attribute(e, "class"),
        message: xml::attribute(e, "message"),
        name: xml::attribute(e, "name"),
        language: xml::attribute(e, "language"),
        ..RuleSetRule::default()
    }
}

fn read_rule(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<RuleSetRule, XmlError> {
    let mut rule = rule_attributes(start);

    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::Start(e) => match xml::local_name(&e).as_str() {
                "priority" => rule.priority = xml::read_text(reader)?.trim().parse().ok(),
                "properties" => rule.properties = read_properties(reader)?,
                _ => xml::skip(reader, &e)?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(rule)
}

fn read_properties(reader: &mut Reader<&[u8]>) -> Result<Vec<RuleProperty>, XmlError> {
    let mut properties = Vec::new();

    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::Empty(e) if xml::local_name(&e) == "property" => {
                if let Some(name) = xml::attribute(&e, "name") {
                    let value = xml::attribute(&e, "value").unwrap_or_default();
                    properties.push(RuleProperty::new(name, value));
                }
            }
            Event::Start(e) if xml::local_name(&e) == "property" => {
                let name = xml::attribute(&e, "name");
                let attribute_value = xml::attribute(&e, "value");
                let body = read_property_body(reader)?;
                if let Some(name) = name {
                    properties.push(match (attribute_value, body) {
                        (_, Some(body)) => RuleProperty::cdata(name, body),
                        (Some(value), None) => RuleProperty::new(name, value),
                        (None, None) => RuleProperty::new(name, ""),
                    });
                }
            }
            Event::Start(e) => xml::skip(reader, &e)?,
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(properties)
}

/// Content of a `<value>` child, if the property has one
fn read_property_body(reader: &mut Reader<&[u8]>) -> Result<Option<String>, XmlError> {
    let mut body = None;

    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::Start(e) if xml::local_name(&e) == "value" => {
                body = Some(xml::read_text(reader)?);
            }
            Event::Empty(e) if xml::local_name(&e) == "value" => body = Some(String::new()),
            Event::Start(e) => xml::skip(reader, &e)?,
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(body)
}
