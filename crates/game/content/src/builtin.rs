//! The world content compiled into the binary.

use game_core::MobDefinition;

/// Mob catalog: Krets, Aggressive Krets and Skeleton.
pub fn builtin_mobs() -> Vec<MobDefinition> {
    vec![
        MobDefinition::new("Krets", 1, 55, (2, 6), 5, (40, 112)),
        MobDefinition::new("Aggressive Krets", 2, 70, (4, 8), 10, (100, 180)),
        MobDefinition::new("Skeleton", 3, 90, (6, 10), 25, (300, 700)),
    ]
}

/// Region table as `(region, mob ids)` pairs, in display order.
pub fn builtin_regions() -> Vec<(String, Vec<String>)> {
    let town_mobs = || vec!["Aggressive Krets".to_string(), "Skeleton".to_string()];
    vec![
        ("Settlement of Klesva".to_string(), vec!["Krets".to_string()]),
        ("Baurwill Town".to_string(), town_mobs()),
        ("King's Tomb".to_string(), town_mobs()),
        ("Light Square".to_string(), town_mobs()),
        ("O'Delvays City Center".to_string(), town_mobs()),
    ]
}
