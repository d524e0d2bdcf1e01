//! XML writer: one `<record>` element per row under a named root.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{ExportError, ExportResult};
use crate::types::DataSet;

/// Root element name used when none is given.
pub const DEFAULT_ROOT_NAME: &str = "data";

/// Element wrapping each row.
pub const RECORD_ELEMENT: &str = "record";

/// Write `dataset` to an XML file.
///
/// Layout:
///
/// ```text
/// <?xml version="1.0" encoding="UTF-8"?>
/// <root_name>
///   <record>
///     <column>value</column>
///     <missing/>
///   </record>
/// </root_name>
/// ```
///
/// Every column becomes a child element named after the column, in schema order. Values use
/// their CSV text; missing values and empty text are written as empty elements. The root name
/// and every column name must be valid XML element names, otherwise
/// [`ExportError::InvalidArgument`] is returned before anything is written.
pub fn write_xml(dataset: &DataSet, path: impl AsRef<Path>, root_name: &str) -> ExportResult<()> {
    check_names(dataset, root_name)?;
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    write_xml_to_writer(dataset, &mut out, root_name)?;
    out.flush()?;
    Ok(())
}

/// Write `dataset` as XML to any [`Write`] sink.
pub fn write_xml_to_writer<W: Write>(dataset: &DataSet, out: W, root_name: &str) -> ExportResult<()> {
    check_names(dataset, root_name)?;
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(root_name)))?;

    let width = dataset.column_count();
    for row in &dataset.rows {
        writer.write_event(Event::Start(BytesStart::new(RECORD_ELEMENT)))?;
        for (idx, name) in dataset.schema.field_names().enumerate().take(width) {
            let text = row.get(idx).map(|v| v.to_string()).unwrap_or_default();
            if text.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(name)))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(RECORD_ELEMENT)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(root_name)))?;
    Ok(())
}

fn check_names(dataset: &DataSet, root_name: &str) -> ExportResult<()> {
    std::iter::once(root_name)
        .chain(dataset.schema.field_names())
        .try_for_each(|name| {
            if is_element_name(name) {
                Ok(())
            } else {
                Err(ExportError::InvalidArgument {
                    message: format!("'{name}' is not a valid XML element name"),
                })
            }
        })
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        _ => false,
    }
}
