//! Demonstration board loaded by the console.
//!
//! The board lives in memory only; every run starts from this roster.

use queueboard_models::{Entry, Priority, Provider, ProviderId, ProviderStatus};
use queueboard_queue::{QueueStore, Result};

/// Providers on shift, in column order.
fn providers() -> Vec<Provider> {
    vec![
        Provider::new("dr-silva", "Dr. Silva", "General Dentistry"),
        Provider::new("dr-costa", "Dr. Costa", "Orthodontics").with_status(ProviderStatus::Busy),
        Provider::new("dr-rocha", "Dr. Rocha", "Endodontics"),
        Provider::new("dr-alves", "Dr. Alves", "Oral Surgery").with_status(ProviderStatus::Break),
    ]
}

/// Waiting patients as `(provider, entry)`, in arrival order.
fn patients() -> Vec<(&'static str, Entry)> {
    vec![
        (
            "dr-silva",
            Entry::builder("Maria Oliveira", "Cleaning")
                .id("p-001")
                .age(34)
                .phone("(11) 98765-4321")
                .waited(25)
                .cost(15000)
                .duration(30)
                .build(),
        ),
        (
            "dr-silva",
            Entry::builder("João Pereira", "Toothache")
                .id("p-002")
                .age(52)
                .phone("(11) 97654-3210")
                .priority(Priority::Urgent)
                .waited(72)
                .cost(20000)
                .duration(45)
                .build(),
        ),
        (
            "dr-silva",
            Entry::builder("Lucas Martins", "Checkup")
                .id("p-003")
                .age(9)
                .phone("(11) 96543-2109")
                .waited(5)
                .cost(10000)
                .duration(20)
                .build(),
        ),
        (
            "dr-costa",
            Entry::builder("Beatriz Santos", "Brace adjustment")
                .id("p-004")
                .age(16)
                .phone("(11) 95432-1098")
                .priority(Priority::High)
                .waited(40)
                .cost(25000)
                .duration(30)
                .build(),
        ),
        (
            "dr-costa",
            Entry::builder("Rafael Lima", "Aligner fitting")
                .id("p-005")
                .age(27)
                .phone("(11) 94321-0987")
                .waited(61)
                .cost(80000)
                .duration(60)
                .build(),
        ),
        (
            "dr-rocha",
            Entry::builder("Fernanda Souza", "Root canal")
                .id("p-006")
                .age(45)
                .phone("(11) 93210-9876")
                .priority(Priority::Urgent)
                .waited(15)
                .cost(90000)
                .duration(90)
                .build(),
        ),
        (
            "dr-rocha",
            Entry::builder("Paulo Ribeiro", "Filling")
                .id("p-007")
                .age(38)
                .phone("(11) 92109-8765")
                .waited(60)
                .cost(18000)
                .duration(40)
                .build(),
        ),
        (
            "dr-alves",
            Entry::builder("Camila Ferreira", "Wisdom tooth extraction")
                .id("p-008")
                .age(22)
                .phone("(11) 91098-7654")
                .priority(Priority::High)
                .waited(0)
                .cost(60000)
                .duration(60)
                .build(),
        ),
    ]
}

/// Builds the demonstration board.
pub fn demo_board() -> Result<QueueStore> {
    let store = QueueStore::new();

    for provider in providers() {
        store.add_provider(provider)?;
    }
    for (provider, entry) in patients() {
        store.enqueue(&ProviderId::from(provider), entry)?;
    }

    Ok(store)
}
