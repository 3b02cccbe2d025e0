//! Scholar hierarchy: scholars, their categories, and subcategories.

use serde::{Deserialize, Serialize};

use crate::domain::{Container, ParseContainerError};

/// A scholar whose works and sayings notes are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholar {
    /// Slug derived from the name, unique across scholars.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub madhhab: Option<String>,
}

impl Scholar {
    /// Creates a scholar. Blank optional fields become `None`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        era: Option<&str>,
        madhhab: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            era: non_blank(era),
            madhhab: non_blank(madhhab),
        }
    }

    /// One-line summary such as `classical · Hanbali`.
    pub fn meta(&self) -> Option<String> {
        let parts: Vec<&str> = [self.era.as_deref(), self.madhhab.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" · "))
        }
    }
}

/// A category of notes under one scholar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarCategory {
    pub id: String,
    pub scholar_id: String,
    pub name: String,
}

impl ScholarCategory {
    pub fn new(id: impl Into<String>, scholar_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scholar_id: scholar_id.into(),
            name: name.into(),
        }
    }

    /// The container notes in this category are filed under.
    pub fn container(&self, scholar: &Scholar) -> Result<Container, ParseContainerError> {
        Container::category(&scholar.name, &self.name)
    }
}

/// A subcategory grouping notes inside a category.
///
/// References its category by `(scholar_id, category_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarSubcategory {
    pub id: String,
    pub scholar_id: String,
    pub category_name: String,
    pub name: String,
}

impl ScholarSubcategory {
    pub fn new(
        id: impl Into<String>,
        scholar_id: impl Into<String>,
        category_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            scholar_id: scholar_id.into(),
            category_name: category_name.into(),
            name: name.into(),
        }
    }

    /// The container notes in this subcategory are filed under.
    pub fn container(&self, scholar: &Scholar) -> Result<Container, ParseContainerError> {
        Container::subcategory(&scholar.name, &self.category_name, &self.name)
    }
}

/// Trims an optional form value, mapping blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
