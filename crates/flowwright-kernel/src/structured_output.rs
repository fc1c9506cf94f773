/// Trait for defining a structured output schema.
///
/// The schema uses the OpenAPI subset accepted by schema-constrained
/// generation endpoints (`type` values in upper case, `nullable`, `enum`).
pub trait StructuredOutput {
    /// Returns the schema for the expected response format.
    fn schema() -> serde_json::Value;
}
