//! The engine's XML report format
//!
//! ```xml
//! <pmd>
//!   <file name="/src/App.java">
//!     <violation beginline="3" endline="5" rule="AvoidPrintStackTrace">Avoid printStackTrace()</violation>
//!   </file>
//!   <error filename="/src/Broken.java" msg="ParseException: ..."/>
//!   <configerror rule="CustomRule" msg="Missing property"/>
//! </pmd>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io;
use std::path::{Path, PathBuf};

use super::{AnalysisReport, ConfigurationError, ProcessingError, Violation};
use crate::utils::xml::{self, XmlError};

/// Namespace of report documents
pub const REPORT_NAMESPACE: &str = "http://pmd.sourceforge.net/report/2.0.0";

/// Parse an engine report
pub fn parse(document: &str) -> Result<AnalysisReport, XmlError> {
    let mut reader = xml::reader(document);
    let mut report = AnalysisReport::default();

    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::Start(e) => match xml::local_name(&e).as_str() {
                "pmd" => {}
                "file" => {
                    let file_path = PathBuf::from(xml::attribute(&e, "name").unwrap_or_default());
                    read_file(&mut reader, &file_path, &mut report)?;
                }
                "error" => {
                    report.processing_errors.push(processing_error(&e));
                    xml::skip(&mut reader, &e)?;
                }
                "configerror" => {
                    report.configuration_errors.push(configuration_error(&e));
                    xml::skip(&mut reader, &e)?;
                }
                _ => xml::skip(&mut reader, &e)?,
            },
            Event::Empty(e) => match xml::local_name(&e).as_str() {
                "error" => report.processing_errors.push(processing_error(&e)),
                "configerror" => report.configuration_errors.push(configuration_error(&e)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(report)
}

fn read_file(
    reader: &mut Reader<&[u8]>,
    file_path: &Path,
    report: &mut AnalysisReport,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::Start(e) if xml::local_name(&e) == "violation" => {
                let description = xml::read_text(reader)?.trim().to_string();
                report.violations.push(violation(&e, file_path, description));
            }
            Event::Empty(e) if xml::local_name(&e) == "violation" => {
                report.violations.push(violation(&e, file_path, String::new()));
            }
            Event::Start(e) => xml::skip(reader, &e)?,
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }
    Ok(())
}

fn violation(e: &BytesStart<'_>, file_path: &Path, description: String) -> Violation {
    let line = |name: &str| {
        xml::attribute(e, name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    };
    Violation {
        rule_name: xml::attribute(e, "rule").unwrap_or_default(),
        file_path: file_path.to_path_buf(),
        begin_line: line("beginline"),
        end_line: line("endline"),
        description,
    }
}

fn processing_error(e: &BytesStart<'_>) -> ProcessingError {
    ProcessingError {
        file_path: xml::attribute(e, "filename").unwrap_or_default(),
        message: xml::attribute(e, "msg").unwrap_or_default(),
    }
}

fn configuration_error(e: &BytesStart<'_>) -> ConfigurationError {
    ConfigurationError {
        rule_name: xml::attribute(e, "rule").unwrap_or_default(),
        message: xml::attribute(e, "msg").unwrap_or_default(),
    }
}

/// Render a report in the engine's XML format.
///
/// Violations are grouped per file, in order of first appearance.
pub fn render(report: &AnalysisReport) -> io::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("pmd");
    root.push_attribute(("xmlns", REPORT_NAMESPACE));
    root.push_attribute(("version", env!("CARGO_PKG_VERSION")));
    emit(&mut writer, Event::Start(root))?;

    let mut files: Vec<&PathBuf> = Vec::new();
    for violation in &report.violations {
        if !files.contains(&&violation.file_path) {
            files.push(&violation.file_path);
        }
    }

    for file in files {
        let name = file.display().to_string();
        let mut element = BytesStart::new("file");
        element.push_attribute(("name", name.as_str()));
        emit(&mut writer, Event::Start(element))?;

        for violation in report.violations.iter().filter(|v| &v.file_path == file) {
            let begin = violation.begin_line.to_string();
            let end = violation.end_line.to_string();
            let mut element = BytesStart::new("violation");
            element.push_attribute(("beginline", begin.as_str()));
            element.push_attribute(("endline", end.as_str()));
            element.push_attribute(("rule", violation.rule_name.as_str()));
            emit(&mut writer, Event::Start(element))?;
            if !violation.description.is_empty() {
                emit(&mut writer, Event::Text(BytesText::new(&violation.description)))?;
            }
            emit(&mut writer, Event::End(BytesEnd::new("violation")))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("file")))?;
    }

    for error in &report.processing_errors {
        let mut element = BytesStart::new("error");
        element.push_attribute(("filename", error.file_path.as_str()));
        element.push_attribute(("msg", error.message.as_str()));
        emit(&mut writer, Event::Empty(element))?;
    }

    for error in &report.configuration_errors {
        let mut element = BytesStart::new("configerror");
        element.push_attribute(("rule", error.rule_name.as_str()));
        element.push_attribute(("msg", error.message.as_str()));
        emit(&mut writer, Event::Empty(element))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("pmd")))?;

    String::from_utf8(writer.into_inner()).map_err(io::Error::other)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> io::Result<()> {
    writer
        .write_event(event)
        .map_err(|e| io::Error::other(e.to_string()))
}
