//! aggregation-count 규칙 시나리오

mod distinct_field;
mod no_fields;
