//! Ruleset XML serialization

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io;

use super::model::{RuleProperty, RuleSet, RuleSetRule};
use super::{RULESET_NAMESPACE, SCHEMA_LOCATION, XSI_NAMESPACE};
use crate::error::RuleSetError;

const INDENT_SIZE: usize = 4;

/// Serialize a ruleset to an XML string
pub fn to_xml(ruleset: &RuleSet) -> Result<String, RuleSetError> {
    let mut buffer = Vec::new();
    write_to(ruleset, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| RuleSetError::Serialize(e.to_string()))
}

/// Serialize a ruleset into `destination`.
///
/// Blank properties are dropped, and a rule whose properties are all blank
/// gets no `<properties>` element at all.
pub fn write_to<W: io::Write>(ruleset: &RuleSet, destination: W) -> Result<(), RuleSetError> {
    let mut writer = Writer::new_with_indent(destination, b' ', INDENT_SIZE);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("ruleset");
    root.push_attribute(("xmlns", RULESET_NAMESPACE));
    root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    root.push_attribute(("name", ruleset.name.as_str()));
    emit(&mut writer, Event::Start(root))?;

    if let Some(description) = &ruleset.description {
        text_element(&mut writer, "description", description)?;
    }

    for rule in &ruleset.rules {
        write_rule(&mut writer, rule)?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("ruleset")))
}

fn write_rule<W: io::Write>(writer: &mut Writer<W>, rule: &RuleSetRule) -> Result<(), RuleSetError> {
    let mut element = BytesStart::new("rule");
    let attributes = [
        ("ref", &rule.reference),
        ("class", &rule.class),
        ("message", &rule.message),
        ("name", &rule.name),
        ("language", &rule.language),
    ];
    for (name, value) in attributes {
        if let Some(value) = value {
            element.push_attribute((name, value.as_str()));
        }
    }

    let properties: Vec<&RuleProperty> = rule.properties.iter().filter(|p| !p.is_blank()).collect();
    if rule.priority.is_none() && properties.is_empty() {
        return emit(writer, Event::Empty(element));
    }

    emit(writer, Event::Start(element))?;
    if let Some(priority) = rule.priority {
        text_element(writer, "priority", &priority.to_string())?;
    }
    if !properties.is_empty() {
        emit(writer, Event::Start(BytesStart::new("properties")))?;
        for property in properties {
            write_property(writer, property)?;
        }
        emit(writer, Event::End(BytesEnd::new("properties")))?;
    }
    emit(writer, Event::End(BytesEnd::new("rule")))
}

fn write_property<W: io::Write>(
    writer: &mut Writer<W>,
    property: &RuleProperty,
) -> Result<(), RuleSetError> {
    let mut element = BytesStart::new("property");
    element.push_attribute(("name", property.name.as_str()));

    if !property.cdata {
        element.push_attribute(("value", property.value.as_str()));
        return emit(writer, Event::Empty(element));
    }

    emit(writer, Event::Start(element))?;
    emit(writer, Event::Start(BytesStart::new("value")))?;
    for section in cdata_sections(&property.value) {
        emit(writer, Event::CData(BytesCData::new(section)))?;
    }
    emit(writer, Event::End(BytesEnd::new("value")))?;
    emit(writer, Event::End(BytesEnd::new("property")))
}

fn text_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), RuleSetError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    if !text.is_empty() {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// Split a CDATA body so that no section contains the `]]>` terminator.
fn cdata_sections(value: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = value;
    while let Some(index) = rest.find("]]>") {
        sections.push(&rest[..index + 2]);
        rest = &rest[index + 2..];
    }
    sections.push(rest);
    sections
}

fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), RuleSetError> {
    writer
        .write_event(event)
        .map_err(|e| RuleSetError::Serialize(e.to_string()))
}
