//! Field extraction
//!
//! Walks a model's declared fields over a live record and produces the
//! weighted text fragments an index entry is built from. Output order
//! follows declaration order, related groups expanded in place.

use crate::weights::BoostWeights;
use ftindex_core::{Error, FieldDescriptor, ModelDef, Record, Result};
use ftindex_engine::{transliterate, Weight};

/// One piece of extracted text and the letter it is weighted at
pub type Fragment = (String, Weight);

/// Extract every searchable fragment of `record`
///
/// # Errors
///
/// Propagates the first failing field value, accessor or deferred
/// relation. Callers attach the object's identity to the error.
pub fn extract(record: &Record, model: &ModelDef, weights: &BoostWeights) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for field in &model.fields {
        extract_field(record, field, weights, &mut fragments)?;
    }
    Ok(fragments)
}

fn extract_field(
    record: &Record,
    field: &FieldDescriptor,
    weights: &BoostWeights,
    out: &mut Vec<Fragment>,
) -> Result<()> {
    match field {
        FieldDescriptor::Search { name, boost } => {
            let text = record.value(name)?.to_text();
            out.push((transliterate(&text), weights.weight_for_boost(*boost)));
        }
        FieldDescriptor::Filter { .. } => {}
        FieldDescriptor::Related { name, fields } => {
            let related = match record.relation(name) {
                Some(relation) => relation.resolve()?,
                None => return Ok(()),
            };
            // each sub-field keeps its own boost
            for sub in &related {
                for sub_field in fields {
                    extract_field(sub, sub_field, weights, out)?;
                }
            }
        }
    }
    Ok(())
}

/// `extract` with failures reported as `Error::Extraction` for `record`
pub(crate) fn extract_object(
    record: &Record,
    model: &ModelDef,
    weights: &BoostWeights,
) -> Result<Vec<Fragment>> {
    extract(record, model, weights).map_err(|e| Error::Extraction {
        content_type: model.content_type.clone(),
        object_id: record.pk().object_id(),
        reason: e.to_string(),
    })
}

/// Plain-text body: fragments joined by newlines, weights dropped
pub fn plain_body(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|(text, _)| text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftindex_core::{FieldValue, Relation};

    fn weights() -> BoostWeights {
        BoostWeights::calibrate(&[10.0, 1.0]).unwrap()
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let model = ModelDef::new("blog.Post")
            .with_field(FieldDescriptor::boosted("title", 10.0))
            .with_field(FieldDescriptor::filter("live"))
            .with_field(FieldDescriptor::boosted("body", 1.0));
        let record = Record::new(1)
            .with_value("title", "X")
            .with_value("live", true)
            .with_value("body", "Y");

        let fragments = extract(&record, &model, &weights()).unwrap();
        assert_eq!(
            fragments,
            vec![("X".to_string(), Weight::A), ("Y".to_string(), Weight::B)]
        );
    }

    #[test]
    fn test_values_coerced_and_transliterated() {
        let model = ModelDef::new("a.A")
            .with_field(FieldDescriptor::search("tags"))
            .with_field(FieldDescriptor::search("missing_ok"))
            .with_field(FieldDescriptor::search("name"));
        let record = Record::new(1)
            .with_value("tags", vec!["rust", "café"])
            .with_value("missing_ok", FieldValue::Null)
            .with_value("name", "Zoë");

        let texts: Vec<String> = extract(&record, &model, &weights())
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(texts, vec!["rust, cafe", "", "Zoe"]);
    }

    #[test]
    fn test_related_fields_use_sub_field_weight() {
        let model = ModelDef::new("blog.Post")
            .with_field(FieldDescriptor::boosted("title", 1.0))
            .with_field(FieldDescriptor::related(
                "authors",
                vec![FieldDescriptor::boosted("name", 10.0)],
            ))
            .with_field(FieldDescriptor::related(
                "category",
                vec![FieldDescriptor::search("label")],
            ))
            .with_field(FieldDescriptor::related(
                "editor",
                vec![FieldDescriptor::search("name")],
            ));
        let authors = vec![
            Record::new(7).with_value("name", "Ann"),
            Record::new(8).with_value("name", "Bob"),
        ];
        let record = Record::new(1)
            .with_value("title", "T")
            .with_related("authors", authors)
            .with_related(
                "category",
                Relation::deferred(|| Ok(Record::new(3).with_value("label", "news").into())),
            )
            .with_related("editor", Relation::Empty);

        let fragments = extract(&record, &model, &weights()).unwrap();
        assert_eq!(
            fragments,
            vec![
                ("T".to_string(), Weight::B),
                ("Ann".to_string(), Weight::A),
                ("Bob".to_string(), Weight::A),
                ("news".to_string(), Weight::B),
            ]
        );
    }

    #[test]
    fn test_failing_accessor_is_extraction_error() {
        let model = ModelDef::new("a.A").with_field(FieldDescriptor::search("computed"));
        let record = Record::new(42).with_accessor("computed", |_| {
            Err(Error::MissingField("upstream".to_string()))
        });

        let err = extract_object(&record, &model, &weights()).unwrap_err();
        match err {
            Error::Extraction { object_id, .. } => assert_eq!(object_id, "42"),
            other => panic!("unexpected error: {other}"),
        }

        let bare = Record::new(43);
        assert!(extract_object(&bare, &model, &weights()).is_err());
    }

    #[test]
    fn test_plain_body() {
        let fragments = vec![("a".to_string(), Weight::A), ("b c".to_string(), Weight::D)];
        assert_eq!(plain_body(&fragments), "a\nb c");
    }
}
