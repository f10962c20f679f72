//! Match criteria.

use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FlowError;
use crate::field::{FieldType, MatchField};

/// An unordered set of match fields, at most one per [`FieldType`].
///
/// Fields not present are wildcarded. An empty match ("match all") is the
/// shape of a table-miss rule. Equality is structural and independent of
/// insertion order.
///
/// # Examples
///
/// ```
/// use of_flow::{FieldType, Match, MatchField};
///
/// let m = Match::builder()
///     .field(MatchField::EthType(0x0806))
///     .build()
///     .unwrap();
/// assert!(m.contains(FieldType::EthType));
/// assert!(!m.is_match_all());
/// assert!(Match::all().is_match_all());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Match {
    fields: BTreeMap<FieldType, MatchField>,
}

impl Match {
    /// Returns the empty (wildcard everything) match.
    pub fn all() -> Self {
        Self::default()
    }

    /// Starts building a match.
    pub fn builder() -> MatchBuilder {
        MatchBuilder::default()
    }

    /// Returns true if no field is constrained.
    pub fn is_match_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of constrained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the match has no fields (same as [`Match::is_match_all`]).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true if the given field type is constrained.
    pub fn contains(&self, field: FieldType) -> bool {
        self.fields.contains_key(&field)
    }

    /// Returns the constraint for a field type, if any.
    pub fn get(&self, field: FieldType) -> Option<&MatchField> {
        self.fields.get(&field)
    }

    /// Iterates the constrained field types in OXM order.
    pub fn field_types(&self) -> impl Iterator<Item = FieldType> + '_ {
        self.fields.keys().copied()
    }

    /// Iterates the constrained fields in OXM order.
    pub fn fields(&self) -> impl Iterator<Item = &MatchField> {
        self.fields.values()
    }

    /// Returns a copy keeping only the fields whose type satisfies `keep`.
    pub fn retain_types<F>(&self, mut keep: F) -> Match
    where
        F: FnMut(FieldType) -> bool,
    {
        Match {
            fields: self
                .fields
                .iter()
                .filter(|(ft, _)| keep(**ft))
                .map(|(ft, mf)| (*ft, *mf))
                .collect(),
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match_all() {
            write!(f, "{{*}}")
        } else {
            write!(f, "{{{}}}", self.fields.values().join(", "))
        }
    }
}

/// Builder for [`Match`], enforcing one constraint per field type.
#[derive(Debug, Clone, Default)]
pub struct MatchBuilder {
    fields: Vec<MatchField>,
}

impl MatchBuilder {
    /// Adds a field constraint.
    pub fn field(mut self, field: MatchField) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds several field constraints.
    pub fn fields(mut self, fields: impl IntoIterator<Item = MatchField>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the match.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::DuplicateField`] if a field type was added twice,
    /// or [`FlowError::InvalidFieldValue`] for an out-of-range value.
    pub fn build(self) -> Result<Match, FlowError> {
        let mut fields = BTreeMap::new();
        for field in self.fields {
            field.validate()?;
            let ft = field.field_type();
            if fields.insert(ft, field).is_some() {
                return Err(FlowError::DuplicateField(ft));
            }
        }
        Ok(Match { fields })
    }
}
