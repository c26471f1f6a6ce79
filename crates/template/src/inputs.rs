//! Input records

use crate::schema::Template;
use std::collections::BTreeMap;

/// Field name to value for one generated copy of the document
pub type Inputs = BTreeMap<String, String>;

/// Derive a single input record from the template's own content
///
/// Used when the UI has no form to collect values from. Read-only schemas
/// render their fixed `content` and are left out.
pub fn get_input_from_template(template: &Template) -> Vec<Inputs> {
    let record = template
        .named_schemas()
        .filter(|(_, schema)| !schema.is_read_only())
        .map(|(name, schema)| (name.to_string(), schema.content.clone().unwrap_or_default()))
        .collect();
    vec![record]
}
