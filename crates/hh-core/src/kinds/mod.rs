//! Type-specific state and behavior for live objects.

pub mod armour;
pub mod character;
pub mod door;
pub mod food;
pub mod weapon;

pub use armour::Armour;
pub use character::{AttackRoll, Character};
pub use door::Door;
pub use food::Food;
pub use weapon::{Attack, Weapon};
