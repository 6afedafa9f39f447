//! The fixed universe of guessable persons, partitioned by category.

use indexmap::{IndexMap, IndexSet};
use rand::Rng;
use thiserror::Error;

/// Roster partition a person belongs to; decides pronouns and the photo folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Persons listed under the `male` photo folder.
    Male,
    /// Persons listed under the `female` photo folder.
    Female,
}

impl Category {
    /// Subject/object pronoun pair used when assembling replies.
    pub fn pronouns(self) -> (&'static str, &'static str) {
        match self {
            Category::Male => ("He", "him"),
            Category::Female => ("She", "her"),
        }
    }

    /// Name of the photo folder holding this category's pictures.
    pub fn folder(self) -> &'static str {
        match self {
            Category::Male => "male",
            Category::Female => "female",
        }
    }
}

/// A guessable person: display name plus the partition it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Full name as listed in the photo folder (without extension).
    pub name: String,
    /// Partition the person belongs to.
    pub category: Category,
}

/// Error returned when a draw is requested from an empty pool.
///
/// Callers must check `finished()` before drawing; hitting this error is a
/// contract violation, not an expected game-flow outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot draw from an empty pool")]
pub struct EmptyPool;

/// Immutable, ordered union of all guessable persons across categories.
///
/// Loaded once at startup; read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Roster {
    persons: IndexMap<String, Category>,
}

impl Roster {
    /// Build a roster from per-category name listings.
    ///
    /// A name that appears in more than one listing keeps its first category;
    /// duplicates are dropped so no name maps to two partitions.
    pub fn new(male: Vec<String>, female: Vec<String>) -> Self {
        let mut persons = IndexMap::with_capacity(male.len() + female.len());
        for name in male {
            persons.entry(name).or_insert(Category::Male);
        }
        for name in female {
            persons.entry(name).or_insert(Category::Female);
        }
        Self { persons }
    }

    /// Total number of persons in the roster.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// True when the roster holds no persons at all.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Category of a person, if the name is part of the roster.
    pub fn category_of(&self, name: &str) -> Option<Category> {
        self.persons.get(name).copied()
    }

    /// Ordered iterator over every person name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.persons.keys().map(String::as_str)
    }

    /// Full ordered set of names, used to seed a fresh game's pool.
    pub fn full_pool(&self) -> IndexSet<String> {
        self.persons.keys().cloned().collect()
    }

    /// Resolve a name into a [`Person`], if it belongs to the roster.
    pub fn person(&self, name: &str) -> Option<Person> {
        self.category_of(name).map(|category| Person {
            name: name.to_string(),
            category,
        })
    }

    /// Uniform-random pick from a non-empty pool of unresolved names.
    pub fn draw(&self, remaining: &IndexSet<String>) -> Result<Person, EmptyPool> {
        if remaining.is_empty() {
            return Err(EmptyPool);
        }
        let index = rand::rng().random_range(0..remaining.len());
        let name = remaining.get_index(index).expect("index in range");
        self.person(name).ok_or(EmptyPool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(
            vec!["Fatih Al-Mutawakkil".into(), "Bob".into()],
            vec!["Alice".into()],
        )
    }

    #[test]
    fn categories_resolved_from_partition() {
        let roster = roster();
        assert_eq!(roster.category_of("Alice"), Some(Category::Female));
        assert_eq!(roster.category_of("Bob"), Some(Category::Male));
        assert_eq!(roster.category_of("Nobody"), None);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn duplicate_name_keeps_first_category() {
        let roster = Roster::new(vec!["Alex".into()], vec!["Alex".into()]);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.category_of("Alex"), Some(Category::Male));
    }

    #[test]
    fn draw_from_empty_pool_is_an_error() {
        let roster = roster();
        let empty = IndexSet::new();
        assert_eq!(roster.draw(&empty), Err(EmptyPool));
    }

    #[test]
    fn draw_returns_member_of_pool() {
        let roster = roster();
        let pool = roster.full_pool();
        for _ in 0..16 {
            let person = roster.draw(&pool).unwrap();
            assert!(pool.contains(&person.name));
            assert_eq!(roster.category_of(&person.name), Some(person.category));
        }
    }

    #[test]
    fn pronouns_follow_category() {
        assert_eq!(Category::Male.pronouns(), ("He", "him"));
        assert_eq!(Category::Female.pronouns(), ("She", "her"));
    }
}
