use uuid::Uuid;

/// Identifier attached to the tracing span of one dispatch cycle.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
