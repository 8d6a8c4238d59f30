//! Built-in shelf-life suggestions for common groceries.
//!
//! Intake surfaces offer these as one-tap defaults; households can always
//! override the number of days by hand.

use serde::Serialize;

/// Shelf life assumed when an item is not in the catalog.
pub const DEFAULT_SHELF_LIFE_DAYS: u32 = 7;

/// One catalog row: a grocery name and its typical shelf life in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShelfLifeEntry {
    pub name: &'static str,
    pub shelf_life_days: u32,
}

const fn entry(name: &'static str, shelf_life_days: u32) -> ShelfLifeEntry {
    ShelfLifeEntry {
        name,
        shelf_life_days,
    }
}

/// Typical fridge/pantry lifetimes. Days count from purchase, not opening.
pub const CATALOG: &[ShelfLifeEntry] = &[
    entry("Milk", 7),
    entry("Eggs", 21),
    entry("Bread", 5),
    entry("Bananas", 4),
    entry("Apples", 14),
    entry("Cheese", 14),
    entry("Yogurt", 10),
    entry("Butter", 30),
    entry("Chicken", 2),
    entry("Beef", 3),
    entry("Fish", 2),
    entry("Rice", 365),
    entry("Pasta", 365),
    entry("Potatoes", 21),
    entry("Onions", 30),
    entry("Carrots", 14),
    entry("Tomatoes", 5),
    entry("Cucumber", 7),
    entry("Spinach", 5),
    entry("Lettuce", 5),
    entry("Broccoli", 5),
    entry("Avocado", 3),
    entry("Orange Juice", 10),
    entry("Coffee", 30),
    entry("Tea", 365),
    entry("Cereal", 180),
    entry("Oatmeal", 365),
    entry("Sugar", 365),
    entry("Flour", 180),
    entry("Oil", 365),
    entry("Salt", 365),
    entry("Pepper", 365),
    entry("Garlic", 60),
    entry("Lemon", 14),
    entry("Honey", 365),
    entry("Jam", 60),
    entry("Peanut Butter", 90),
    entry("Chocolate", 180),
    entry("Ice Cream", 60),
    entry("Pizza", 3),
    entry("Soda", 90),
    entry("Water", 365),
    entry("Beer", 90),
    entry("Wine", 365),
];

/// Case-insensitive catalog lookup.
#[must_use]
pub fn suggested_shelf_life(name: &str) -> Option<u32> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(wanted))
        .map(|e| e.shelf_life_days)
}

/// Catalog lookup falling back to [`DEFAULT_SHELF_LIFE_DAYS`].
#[must_use]
pub fn shelf_life_or_default(name: &str) -> u32 {
    suggested_shelf_life(name).unwrap_or(DEFAULT_SHELF_LIFE_DAYS)
}
