//! Scope and attribute filters
//!
//! User-supplied codes are resolved once, up front, into identifier sets.
//! Resolution fails closed: one bad code rejects the whole filter, and no
//! sweep starts.

use crate::error::{store_error, JanitorError, ValidationError};
use eavclean_domain::{AttributeDirectory, EntityKind, Predicate, ScopeDirectory};
use std::fmt::Display;

/// Reserved code of the global scope
pub const ADMIN_SCOPE_CODE: &str = "admin";

/// Resolved set of override scopes a sweep may touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    /// `None` means every non-global scope is eligible
    pub scope_ids: Option<Vec<i64>>,
}

impl ScopeFilter {
    /// Filter with no restriction
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Whether no restriction applies
    pub fn is_unrestricted(&self) -> bool {
        self.scope_ids.is_none()
    }

    /// Whether `scope_id` is eligible
    pub fn allows(&self, scope_id: i64) -> bool {
        match &self.scope_ids {
            Some(ids) => ids.contains(&scope_id),
            None => true,
        }
    }

    /// Predicate over `column`
    pub fn predicate(&self, column: &str) -> Predicate {
        match &self.scope_ids {
            Some(ids) => Predicate::is_in(column, ids.iter().copied()),
            None => Predicate::True,
        }
    }
}

/// Resolved include/exclude attribute sets
///
/// Include is applied first, then exclude, so an id named in both lists is
/// never eligible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    /// `None` means every attribute is eligible before exclusion
    pub include: Option<Vec<i64>>,
    /// Ids removed from eligibility
    pub exclude: Vec<i64>,
}

impl AttributeFilter {
    /// Filter with no restriction
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Whether `attribute_id` is eligible
    pub fn is_eligible(&self, attribute_id: i64) -> bool {
        let included = match &self.include {
            Some(ids) => ids.contains(&attribute_id),
            None => true,
        };
        included && !self.exclude.contains(&attribute_id)
    }

    /// Predicate over `column`
    pub fn predicate(&self, column: &str) -> Predicate {
        let include = match &self.include {
            Some(ids) => Predicate::is_in(column, ids.iter().copied()),
            None => Predicate::True,
        };
        let exclude = if self.exclude.is_empty() {
            Predicate::True
        } else {
            Predicate::not_in(column, self.exclude.iter().copied())
        };
        include.and(exclude)
    }
}

/// Trim codes and drop empty ones; `None` when nothing is left
fn normalize(codes: Option<&[String]>) -> Option<Vec<&str>> {
    let codes: Vec<&str> = codes?
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if codes.is_empty() {
        None
    } else {
        Some(codes)
    }
}

/// Resolve scope codes into a [`ScopeFilter`]
///
/// The whole list is checked for the global alias before the directory is
/// consulted, so a forbidden request performs no lookups at all.
pub fn resolve_scope_filter<D>(directory: &D, codes: Option<&[String]>) -> Result<ScopeFilter, JanitorError>
where
    D: ScopeDirectory,
    D::Error: Display,
{
    let Some(codes) = normalize(codes) else {
        return Ok(ScopeFilter::unrestricted());
    };

    if codes.iter().any(|c| *c == ADMIN_SCOPE_CODE) {
        return Err(ValidationError::ForbiddenScope.into());
    }

    let mut ids = Vec::with_capacity(codes.len());
    for code in codes {
        match directory.scope_id(code).map_err(store_error)? {
            Some(id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            None => {
                return Err(ValidationError::UnknownScope { code: code.to_string() }.into());
            }
        }
    }

    Ok(ScopeFilter { scope_ids: Some(ids) })
}

/// Resolve attribute codes of `kind` into an [`AttributeFilter`]
pub fn resolve_attribute_filter<D>(
    directory: &D,
    kind: EntityKind,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Result<AttributeFilter, JanitorError>
where
    D: AttributeDirectory,
    D::Error: Display,
{
    let entity_type = kind.entity_type();
    let resolve = |codes: Vec<&str>| -> Result<Vec<i64>, JanitorError> {
        let mut ids = Vec::with_capacity(codes.len());
        for code in codes {
            let id = directory
                .attribute_id(entity_type.as_str(), code)
                .map_err(store_error)?
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    entity_type: entity_type.as_str().to_string(),
                    code: code.to_string(),
                })?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    };

    let include = normalize(include).map(&resolve).transpose()?;
    let exclude = normalize(exclude).map(&resolve).transpose()?.unwrap_or_default();

    Ok(AttributeFilter { include, exclude })
}

/// Parse a user-supplied entity kind
pub fn parse_entity_kind(input: &str) -> Result<EntityKind, ValidationError> {
    EntityKind::parse(input.trim()).ok_or_else(|| ValidationError::InvalidEntityKind(input.to_string()))
}
