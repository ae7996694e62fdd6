//! Client-side search, price filtering, and ordering of the trips list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::trip::Trip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Name,
    Price,
    Duration,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortKey {
    fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Duration => "duration",
            SortKey::CreatedAt => "created_at",
        }
    }
}

/// A sort key paired with a direction, written as `"<key>-<order>"`
/// (for example `"price-asc"` or `"created_at-desc"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        write!(f, "{}-{order}", self.key.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, order) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("sort must look like 'price-asc', got '{s}'"))?;
        let key = match key {
            "name" => SortKey::Name,
            "price" => SortKey::Price,
            "duration" => SortKey::Duration,
            "created_at" => SortKey::CreatedAt,
            other => return Err(format!("unknown sort key '{other}'")),
        };
        let order = match order {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            other => return Err(format!("unknown sort order '{other}'")),
        };
        Ok(Self { key, order })
    }
}

/// Filters applied to the trips list. The default matches every trip and
/// shows the newest first.
#[derive(Debug, Clone, Default)]
pub struct TripQuery {
    pub search: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: SortSpec,
}

impl TripQuery {
    /// Whether `trip` passes the search term and price bounds.
    #[must_use]
    pub fn matches(&self, trip: &Trip) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = trip.name.to_lowercase().contains(&needle)
            || trip.description.to_lowercase().contains(&needle);
        let above_min = self.min_price.is_none_or(|min| trip.price >= min);
        let below_max = self.max_price.is_none_or(|max| trip.price <= max);
        matches_search && above_min && below_max
    }

    /// Returns the matching trips in the requested order.
    #[must_use]
    pub fn apply<'a>(&self, trips: &'a [Trip]) -> Vec<&'a Trip> {
        let mut out: Vec<&Trip> = trips.iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| {
            let ord = compare(self.sort.key, a, b);
            match self.sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        out
    }

    /// Whether any filter deviates from the default query.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.min_price.is_some() || self.max_price.is_some()
    }
}

fn compare(key: SortKey, a: &Trip, b: &Trip) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::Duration => a.duration.cmp(&b.duration),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// The `"Showing X of Y trips"` line under the filters.
#[must_use]
pub fn summary(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total} trips")
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
