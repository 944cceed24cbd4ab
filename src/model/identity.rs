use std::fmt;

/// Name under which the service is registered with the supervisor.
///
/// Holds both the narrow form used for logging and the NUL-terminated UTF-16 form the
/// supervisor API takes. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    name: String,
    wide_name: Vec<u16>,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let wide_name = name.encode_utf16().chain(std::iter::once(0)).collect();
        Self { name, wide_name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// UTF-16 name including the trailing NUL.
    pub fn wide_name(&self) -> &[u16] {
        &self.wide_name
    }

    /// UTF-16 name without the trailing NUL.
    pub fn wide_name_trimmed(&self) -> &[u16] {
        let len = self.wide_name.len().saturating_sub(1);
        &self.wide_name[..len]
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
