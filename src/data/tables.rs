//! Read-only reference tables built once at startup.

use std::collections::{HashMap, HashSet};

use crate::error::{AppError, AppResult};
use crate::models::{normalize_code, BusinessRecord, Category, CityCoordinate, State};

fn same_city(a: &str, b: &str) -> bool {
    normalize_code(a) == normalize_code(b)
}

/// The business catalog, indexed by external and integer id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<BusinessRecord>,
    by_id: HashMap<String, usize>,
    by_int_id: HashMap<u32, usize>,
}

impl Catalog {
    /// Builds the catalog, rejecting duplicate business ids
    pub fn new(records: Vec<BusinessRecord>) -> AppResult<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_int_id = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if by_id.insert(record.business_id.clone(), position).is_some() {
                return Err(AppError::Data(format!(
                    "duplicate business_id '{}'",
                    record.business_id
                )));
            }
            if by_int_id.insert(record.business_int_id, position).is_some() {
                return Err(AppError::Data(format!(
                    "duplicate business_id_int {}",
                    record.business_int_id
                )));
            }
        }

        Ok(Self {
            records,
            by_id,
            by_int_id,
        })
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, business_id: &str) -> Option<&BusinessRecord> {
        self.by_id.get(business_id).map(|&i| &self.records[i])
    }

    pub fn get_by_int_id(&self, business_int_id: u32) -> Option<&BusinessRecord> {
        self.by_int_id.get(&business_int_id).map(|&i| &self.records[i])
    }

    /// True when at least one business of `state` is located in `city`
    pub fn has_city(&self, state: State, city: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.state == state && same_city(&r.city, city))
    }
}

/// Maps external user ids to the integer index the scoring model uses
#[derive(Debug, Clone, Default)]
pub struct UserIndex {
    by_user_id: HashMap<String, u32>,
    sentinel: Option<String>,
}

impl UserIndex {
    /// Builds the index. `sentinel_user_id` marks the row reserved for unknown users.
    pub fn new(rows: Vec<(String, u32)>, sentinel_user_id: &str) -> AppResult<Self> {
        let mut by_user_id = HashMap::with_capacity(rows.len());
        let mut seen_indices = HashSet::with_capacity(rows.len());

        for (user_id, index) in rows {
            if !seen_indices.insert(index) {
                return Err(AppError::Data(format!("duplicate user_id_int {}", index)));
            }
            if by_user_id.insert(user_id.clone(), index).is_some() {
                return Err(AppError::Data(format!("duplicate user_id '{}'", user_id)));
            }
        }

        let sentinel = by_user_id
            .contains_key(sentinel_user_id)
            .then(|| sentinel_user_id.to_string());
        if sentinel.is_none() {
            tracing::warn!(
                sentinel_user_id = %sentinel_user_id,
                "User index has no sentinel row; unknown users can't be served"
            );
        }

        Ok(Self {
            by_user_id,
            sentinel,
        })
    }

    /// Exact-match lookup of a user's integer index
    pub fn lookup(&self, user_id: &str) -> Option<u32> {
        self.by_user_id.get(user_id).copied()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.by_user_id.contains_key(user_id)
    }

    pub fn is_sentinel(&self, user_id: &str) -> bool {
        self.sentinel.as_deref() == Some(user_id)
    }

    pub fn sentinel(&self) -> Option<&str> {
        self.sentinel.as_deref()
    }

    pub fn len(&self) -> usize {
        self.by_user_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user_id.is_empty()
    }
}

/// Many-to-many association of business ids to general categories
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    by_business: HashMap<String, Vec<Category>>,
}

impl CategoryMap {
    pub fn new(rows: Vec<(String, Category)>) -> Self {
        let mut by_business: HashMap<String, Vec<Category>> = HashMap::new();
        for (business_id, category) in rows {
            let categories = by_business.entry(business_id).or_default();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Self { by_business }
    }

    pub fn categories_of(&self, business_id: &str) -> &[Category] {
        self.by_business
            .get(business_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when the business is tagged with any of `wanted`
    pub fn intersects(&self, business_id: &str, wanted: &[Category]) -> bool {
        self.categories_of(business_id)
            .iter()
            .any(|c| wanted.contains(c))
    }

    pub fn len(&self) -> usize {
        self.by_business.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_business.is_empty()
    }
}

/// Per-state ordered city centroid tables, indexed by [`State::ordinal`]
#[derive(Debug, Clone)]
pub struct CityCoordinates {
    by_state: Vec<Vec<CityCoordinate>>,
}

impl Default for CityCoordinates {
    fn default() -> Self {
        Self {
            by_state: vec![Vec::new(); State::ALL.len()],
        }
    }
}

impl CityCoordinates {
    /// Builds the tables, keeping each state's cities in input order
    pub fn new(rows: Vec<(State, CityCoordinate)>) -> Self {
        let mut table = Self::default();
        for (state, coordinate) in rows {
            table.by_state[state.ordinal()].push(coordinate);
        }
        table
    }

    pub fn cities(&self, state: State) -> &[CityCoordinate] {
        &self.by_state[state.ordinal()]
    }

    /// Centroid of `city` within `state`'s table
    pub fn centroid(&self, state: State, city: &str) -> Option<&CityCoordinate> {
        self.cities(state).iter().find(|c| same_city(&c.city, city))
    }

    pub fn len(&self) -> usize {
        self.by_state.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
