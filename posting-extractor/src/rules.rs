use lazy_static::lazy_static;
use regex::Regex;

use crate::types::Metadata;

type FieldSetter = fn(&mut Metadata, String);

/// Bold labels in the metadata paragraph, matched by substring on the
/// lower-cased label text. Every rule is tried against every label.
pub const LABEL_RULES: &[(&str, FieldSetter)] = &[
    ("positions", set_positions),
    ("type of student", set_student_type),
    ("deadline", set_deadline),
];

fn set_positions(meta: &mut Metadata, content: String) {
    meta.positions = content;
}

fn set_student_type(meta: &mut Metadata, content: String) {
    meta.student_type = content;
}

fn set_deadline(meta: &mut Metadata, content: String) {
    meta.deadline = content;
}

/// Trims the text that follows a label and drops a leading colon.
pub fn label_content(raw: &str) -> String {
    lazy_static! {
        static ref LEADING_COLON: Regex = Regex::new(r"^:\s*").unwrap();
    }
    LEADING_COLON.replace(raw.trim(), "").into_owned()
}

/// Applies every matching rule for `label`, returns how many matched.
pub fn apply_label(meta: &mut Metadata, label: &str, content: &str) -> usize {
    let label = label.to_lowercase();
    let mut matched = 0;
    for (needle, set) in LABEL_RULES {
        if label.contains(needle) {
            set(meta, content.to_owned());
            matched += 1;
        }
    }
    if matched == 0 {
        log::debug!("ignoring unknown metadata label: '{}'", label.trim());
    }
    matched
}
