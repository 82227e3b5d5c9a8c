use std::collections::HashMap;

/// An untrusted form submission as received. Lives for one invocation.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    pub form_name: String,
    pub fields: HashMap<String, String>,
}

impl RawSubmission {
    pub fn new(form_name: impl Into<String>) -> Self {
        Self {
            form_name: form_name.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// Trimmed field value, empty when absent.
    pub fn text(&self, name: &str) -> &str {
        self.field(name).map(str::trim).unwrap_or("")
    }
}
