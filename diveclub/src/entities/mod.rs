//! Sea-ORM entities for the three record types.
//!
//! `member` owns both `dive` (required, cascading delete) and `equipment`
//! (optional, owner cleared on delete).

pub mod dive;
pub mod equipment;
pub mod member;

pub use equipment::EquipmentType;
