//! Builder patterns for complex types.

use crate::entry::{Entry, Priority};
use crate::ids::EntryId;

/// Builder for creating Entry instances with a fluent API.
///
/// This is how the registration flow hands a fully populated entry to the
/// board.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    id: Option<EntryId>,
    name: String,
    service_label: String,
    age: u32,
    phone: String,
    priority: Priority,
    wait_time_minutes: u32,
    estimated_cost: u32,
    estimated_duration_minutes: u32,
}

impl EntryBuilder {
    /// Creates a new EntryBuilder with required fields.
    pub fn new(name: impl Into<String>, service_label: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            service_label: service_label.into(),
            age: 0,
            phone: String::new(),
            priority: Priority::Normal,
            wait_time_minutes: 0,
            estimated_cost: 0,
            estimated_duration_minutes: 0,
        }
    }

    /// Uses a caller-supplied id instead of a generated one.
    pub fn id(mut self, id: impl Into<EntryId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the patient age.
    pub fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    /// Sets the contact phone.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets minutes already waited (e.g. when arriving from the front desk).
    pub fn waited(mut self, minutes: u32) -> Self {
        self.wait_time_minutes = minutes;
        self
    }

    /// Sets the estimated cost in minor currency units.
    pub fn cost(mut self, cost: u32) -> Self {
        self.estimated_cost = cost;
        self
    }

    /// Sets the estimated chair time.
    pub fn duration(mut self, minutes: u32) -> Self {
        self.estimated_duration_minutes = minutes;
        self
    }

    /// Builds the Entry.
    pub fn build(self) -> Entry {
        Entry {
            id: self.id.unwrap_or_default(),
            name: self.name,
            age: self.age,
            phone: self.phone,
            priority: self.priority,
            wait_time_minutes: self.wait_time_minutes,
            service_label: self.service_label,
            estimated_cost: self.estimated_cost,
            estimated_duration_minutes: self.estimated_duration_minutes,
        }
    }
}

/// Convenience methods on Entry for creating builders.
impl Entry {
    /// Creates a builder for a new entry.
    pub fn builder(name: impl Into<String>, service_label: impl Into<String>) -> EntryBuilder {
        EntryBuilder::new(name, service_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder_basic() {
        let entry = Entry::builder("Carlos Mendes", "Extraction").build();

        assert!(!entry.id.as_str().is_empty());
        assert_eq!(entry.name, "Carlos Mendes");
        assert_eq!(entry.service_label, "Extraction");
        assert_eq!(entry.priority, Priority::Normal);
        assert_eq!(entry.wait_time_minutes, 0);
    }

    #[test]
    fn test_entry_builder_all_fields() {
        let entry = Entry::builder("Carlos Mendes", "Extraction")
            .id("p-42")
            .age(37)
            .phone("+55 11 99999-0000")
            .priority(Priority::Urgent)
            .waited(15)
            .cost(45000)
            .duration(40)
            .build();

        assert_eq!(entry.id.as_str(), "p-42");
        assert_eq!(entry.age, 37);
        assert_eq!(entry.phone, "+55 11 99999-0000");
        assert_eq!(entry.priority, Priority::Urgent);
        assert_eq!(entry.wait_time_minutes, 15);
        assert_eq!(entry.estimated_cost, 45000);
        assert_eq!(entry.estimated_duration_minutes, 40);
    }
}
