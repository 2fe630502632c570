use serde::Deserialize;

/// Contact-form submission.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_fields() {
        let body = r#"{"name":"Ada","email":"ada@example.com","subject":"Hi","message":"Hello","spam":1}"#;
        assert!(serde_json::from_str::<ContactRequest>(body).is_err());
    }
}
