//! Label: the identity pair that brands every Units of one mint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::MintId;

/// `{ assay identity, alleged name }`.
///
/// Equality and hashing look only at the [`MintId`]: the alleged name is a
/// human hint and may be shared by unrelated mints.
#[derive(Clone, Serialize, Deserialize)]
pub struct Label {
    mint_id: MintId,
    alleged_name: String,
}

impl Label {
    /// Create a label with a freshly generated identity.
    pub fn new(alleged_name: &str) -> Self {
        Self {
            mint_id: MintId::generate(alleged_name),
            alleged_name: alleged_name.to_string(),
        }
    }

    /// Rebuild a label around a known identity.
    pub fn from_parts(mint_id: MintId, alleged_name: &str) -> Self {
        Self {
            mint_id,
            alleged_name: alleged_name.to_string(),
        }
    }

    pub fn mint_id(&self) -> MintId {
        self.mint_id
    }

    pub fn alleged_name(&self) -> &str {
        &self.alleged_name
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.mint_id == other.mint_id
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mint_id.hash(state);
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({:?}, {})", self.alleged_name, self.mint_id)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.alleged_name, self.mint_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_different_identity() {
        let a = Label::new("tickets");
        let b = Label::new("tickets");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_equality_ignores_name() {
        let id = MintId::from_bytes([1; 32]);
        assert_eq!(Label::from_parts(id, "a"), Label::from_parts(id, "b"));
    }
}
