//! Whole-document conversion: parse, translate section by section in input
//! order, concatenate.
//!
//! Registration order is evaluation order in the JavaScript engine, so
//! preserving input order here is a correctness requirement. Failure is
//! fail-fast per document: the first failing section aborts the rest.

use tracing::debug;

use crate::error::ConvertError;
use crate::parser::{parse_document, parse_section};
use crate::translator::translate;

/// Convert a complete `.pkla` document into the JavaScript rule script,
/// one registration statement per section, each terminated by a blank line.
pub fn convert_document(input: &str) -> Result<String, ConvertError> {
    let sections = parse_document(input)?;
    let mut output = String::new();

    for section in &sections {
        let record = parse_section(section)?;
        let statement = translate(&record)?;
        debug!(
            event = "Convert",
            phase = "Section",
            section = %section.name,
            bytes = statement.len()
        );
        output.push_str(&statement);
        output.push('\n');
    }

    Ok(output)
}
