//! Filter and sort parameters for listing alumni.

use serde::Deserialize;

use super::Alumni;
use crate::errors::AppError;

/// Query-string parameters for `GET /api/alumni`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

impl ListQuery {
    /// Equality filters; empty values count as absent.
    pub fn filter(&self) -> AlumniFilter {
        AlumniFilter {
            batch: non_empty(&self.batch),
            gender: non_empty(&self.gender),
        }
    }

    /// The requested ordering, if any.
    ///
    /// The order token is only checked when a sort key is present.
    pub fn sort(&self) -> Result<Option<Sort>, AppError> {
        let Some(field) = non_empty(&self.sort_by) else {
            return Ok(None);
        };
        let key = field.parse::<SortKey>()?;
        let order = match self.order.as_deref() {
            None => SortOrder::Asc,
            Some(token) => token.parse::<SortOrder>()?,
        };
        Ok(Some(Sort { key, order }))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Equality filters on batch and gender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlumniFilter {
    pub batch: Option<String>,
    pub gender: Option<String>,
}

impl AlumniFilter {
    pub fn matches(&self, alumni: &Alumni) -> bool {
        let batch_ok = self.batch.as_deref().map_or(true, |b| alumni.batch == b);
        let gender_ok = self
            .gender
            .as_deref()
            .map_or(true, |g| alumni.profile.gender.as_str() == g);
        batch_ok && gender_ok
    }
}

/// The one supported sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    IndustryExperiences,
}

impl std::str::FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Industry_experiences" | "industry_experiences" => Ok(SortKey::IndustryExperiences),
            _ => Err(AppError::BadRequest(
                "You can only sort by 'Industry_experiences'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::BadRequest(
                "Order must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Sort {
    /// Stable sort; records with equal keys keep their stored order.
    pub fn apply(&self, records: &mut [Alumni]) {
        records.sort_by(|a, b| {
            let ordering = match self.key {
                SortKey::IndustryExperiences => {
                    a.experience_or_zero().total_cmp(&b.experience_or_zero())
                }
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(sort_by: Option<&str>, order: Option<&str>) -> ListQuery {
        ListQuery {
            sort_by: sort_by.map(String::from),
            order: order.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_sort_key_ignores_order() {
        assert_eq!(query(None, Some("sideways")).sort().unwrap(), None);
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        let sort = query(Some("Industry_experiences"), None).sort().unwrap().unwrap();
        assert_eq!(sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_unsupported_sort_key_is_bad_request() {
        assert!(matches!(
            query(Some("batch"), None).sort(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_unsupported_order_is_bad_request() {
        assert!(matches!(
            query(Some("Industry_experiences"), Some("up")).sort(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_empty_filters_are_absent() {
        let q = ListQuery {
            batch: Some(String::new()),
            gender: Some("Female".to_string()),
            ..Default::default()
        };
        let filter = q.filter();
        assert_eq!(filter.batch, None);
        assert_eq!(filter.gender.as_deref(), Some("Female"));
    }
}
