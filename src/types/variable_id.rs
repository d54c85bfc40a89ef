use crate::types::ecv::Ecv;

/// A user-supplied variable identifier: a sensor code, or a name that is either a
/// sensor display name, an ECV synonym, or an all-digit code in string form.
///
/// # Examples
///
/// ```
/// use agrometeo::VariableId;
///
/// assert_eq!(VariableId::from(1u32), VariableId::Code(1));
/// assert_eq!(VariableId::from("temperature"), VariableId::Name("temperature".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableId {
    Code(u32),
    Name(String),
}

impl VariableId {
    /// The code this identifier denotes without any catalog lookup, if it is numeric.
    pub(crate) fn as_code(&self) -> Option<u32> {
        match self {
            VariableId::Code(code) => Some(*code),
            VariableId::Name(name) => {
                let trimmed = name.trim();
                if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
                    trimmed.parse().ok()
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableId::Code(code) => write!(f, "{code}"),
            VariableId::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl From<u32> for VariableId {
    fn from(code: u32) -> Self {
        VariableId::Code(code)
    }
}

/// Negative codes cannot exist; they are kept as text so resolution reports them.
impl From<i32> for VariableId {
    fn from(code: i32) -> Self {
        u32::try_from(code)
            .map(VariableId::Code)
            .unwrap_or_else(|_| VariableId::Name(code.to_string()))
    }
}

impl From<&str> for VariableId {
    fn from(name: &str) -> Self {
        VariableId::Name(name.to_string())
    }
}

impl From<String> for VariableId {
    fn from(name: String) -> Self {
        VariableId::Name(name)
    }
}

impl From<Ecv> for VariableId {
    fn from(ecv: Ecv) -> Self {
        VariableId::Name(ecv.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_forms() {
        assert_eq!(VariableId::from(1i32).as_code(), Some(1));
        assert_eq!(VariableId::from(" 24 ").as_code(), Some(24));
        assert_eq!(VariableId::from("1.5").as_code(), None);
        assert_eq!(VariableId::from("").as_code(), None);
        assert_eq!(VariableId::from(-3i32).as_code(), None);
        assert_eq!(VariableId::from("temperature").as_code(), None);
        assert_eq!(
            VariableId::from(Ecv::Temperature),
            VariableId::from("temperature")
        );
    }
}
