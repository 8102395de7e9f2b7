use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps a sensitive value (CPF, phone number) so it never shows up in logs.
///
/// `Debug` and `Display` keep only the last two characters visible.
/// Serialization writes the real value, since API payloads need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> Masked<T> {
    fn redacted(&self) -> String {
        let raw = self.0.to_string();
        let visible = raw.chars().count().saturating_sub(2);
        raw.chars()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { c })
            .collect()
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.redacted())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
