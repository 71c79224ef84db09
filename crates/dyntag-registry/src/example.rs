//! Example tag set.

use crate::tag::TagOccurrence;
use crate::tag_set::{Handlers, TagDeclaration, TagSet};

/// Two demonstration tags: `{tag}` and `{tag_with_attr:attr1:attr2}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleTags;

impl TagSet for ExampleTags {
    fn tags(&self) -> Vec<TagDeclaration> {
        vec![
            TagDeclaration::new("{tag}", "Tag", "Example"),
            TagDeclaration::new("{tag_with_attr}", "Tag With Attr", "Example"),
        ]
    }

    fn handlers(&self) -> Handlers {
        Handlers::new()
            .with("tag", |_, _, _| "Processed Tag Value".to_owned())
            .with("tag_with_attr", tag_with_attr)
    }
}

fn tag_with_attr(_subject_id: u64, occurrence: &str, _context: &str) -> String {
    let occurrence = TagOccurrence::new(occurrence);
    format!(
        "Attribute1: {}, Attribute2: {}",
        occurrence.attr(0),
        occurrence.attr(1)
    )
}
