// Combat: the damage contract and attack hitboxes

pub mod damage;
pub mod hitbox;

pub use damage::{DamageEvent, Damageable, Health, HitReport};
pub use hitbox::Hitbox;
