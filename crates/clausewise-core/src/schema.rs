/// Arrow schema for ranked key points, used for tabular output.
pub mod key_points {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float32Array, StringArray, UInt32Array, UInt64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;

    use crate::point::CandidatePoint;

    /// Schema for one row per ranked candidate.
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("rank", DataType::UInt32, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("confidence", DataType::Float32, false),
            Field::new("position", DataType::UInt64, false),
            Field::new("text", DataType::Utf8, false),
            Field::new("matched_concept", DataType::Utf8, true),
            Field::new("entity_type", DataType::Utf8, true),
        ])
    }

    /// Build a single batch from ranked candidates (rank starts at 1).
    pub fn to_batch(points: &[CandidatePoint]) -> Result<RecordBatch, ArrowError> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from_iter_values(1..=points.len() as u32)),
            Arc::new(StringArray::from_iter_values(
                points.iter().map(|p| p.category().as_str()),
            )),
            Arc::new(Float32Array::from_iter_values(
                points.iter().map(|p| p.confidence()),
            )),
            Arc::new(UInt64Array::from_iter_values(
                points.iter().map(|p| p.position() as u64),
            )),
            Arc::new(StringArray::from_iter_values(points.iter().map(|p| p.text()))),
            Arc::new(StringArray::from(
                points.iter().map(|p| p.matched_concept()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                points.iter().map(|p| p.entity_type()).collect::<Vec<_>>(),
            )),
        ];
        RecordBatch::try_new(Arc::new(schema()), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::key_points;
    use crate::point::{CandidatePoint, Category};
    use arrow::array::{Array, StringArray, UInt32Array};

    #[test]
    fn key_point_schema_has_expected_fields() {
        let schema = key_points::schema();
        assert_eq!(schema.fields().len(), 7);
        assert!(schema.field_with_name("confidence").is_ok());
        assert!(schema.field_with_name("matched_concept").unwrap().is_nullable());
    }

    #[test]
    fn batch_from_points() {
        let points = vec![
            CandidatePoint::new("Tenant shall pay.", Category::Obligation, 0.95, 0),
            CandidatePoint::new("Governed by Delaware law.", Category::SemanticMatch, 0.8, 18)
                .with_concept("governing law"),
        ];
        let batch = key_points::to_batch(&points).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let rank = batch.column(0).as_any().downcast_ref::<UInt32Array>().unwrap();
        assert_eq!(rank.value(1), 2);

        let concept = batch
            .column_by_name("matched_concept")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert!(concept.is_null(0));
        assert_eq!(concept.value(1), "governing law");
    }

    #[test]
    fn empty_batch() {
        let batch = key_points::to_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
    }
}
