//! Sample data for development and demos.
//!
//! [`seed`] wipes the three tables and refills them with a fixed number of
//! randomized records. Pass a seeded RNG for reproducible data.

use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, TransactionTrait,
};

use crate::entities::{EquipmentType, dive, equipment, member};

pub const MEMBER_COUNT: usize = 10;
pub const DIVE_COUNT: usize = 30;
pub const EQUIPMENT_COUNT: usize = 15;

pub const CERTIFICATIONS: [&str; 3] = ["Open Water", "Advanced", "Rescue Diver"];
pub const LOCATIONS: [&str; 3] = ["Jadransko more", "Plitvice", "Crveno more"];

/// Rows removed and inserted by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub removed: u64,
    pub members: usize,
    pub dives: usize,
    pub equipment: usize,
}

/// Replace all records with freshly generated sample data.
///
/// Runs in a single transaction: either every table is refilled or nothing
/// changes.
///
/// # Errors
///
/// Returns the first database error; the transaction is rolled back.
pub async fn seed<R: Rng + Send>(db: &DatabaseConnection, rng: &mut R) -> Result<SeedSummary, DbErr> {
    let today = Local::now().date_naive();
    let txn = db.begin().await?;

    let mut removed = dive::Entity::delete_many().exec(&txn).await?.rows_affected;
    removed += equipment::Entity::delete_many().exec(&txn).await?.rows_affected;
    removed += member::Entity::delete_many().exec(&txn).await?.rows_affected;
    tracing::warn!(removed, "Cleared existing records");

    let mut member_ids = Vec::with_capacity(MEMBER_COUNT);
    for i in 0..MEMBER_COUNT {
        let model = member::ActiveModel {
            first_name: Set(format!("Clan{i}")),
            last_name: Set(format!("Prezime{i}")),
            email: Set(format!("clan{i}@klub.hr")),
            certification: Set(CERTIFICATIONS[i % CERTIFICATIONS.len()].to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        member_ids.push(model.id);
    }
    tracing::info!(count = member_ids.len(), "Generated members");

    let dives: Vec<dive::ActiveModel> = (0..DIVE_COUNT)
        .map(|_| dive::ActiveModel {
            member_id: Set(member_ids[rng.gen_range(0..member_ids.len())]),
            location: Set(LOCATIONS[rng.gen_range(0..LOCATIONS.len())].to_string()),
            date: Set(days_before(today, rng.gen_range(1..=365))),
            depth: Set(Decimal::from(rng.gen_range(10..=40_i64))),
            duration: Set(rng.gen_range(20..=90)),
            ..Default::default()
        })
        .collect();
    dive::Entity::insert_many(dives).exec(&txn).await?;
    tracing::info!(count = DIVE_COUNT, "Generated dives");

    let items: Vec<equipment::ActiveModel> = (0..EQUIPMENT_COUNT)
        .map(|i| equipment::ActiveModel {
            name: Set(format!("Oprema {i}")),
            equipment_type: Set(EquipmentType::ALL[rng.gen_range(0..EquipmentType::ALL.len())]),
            is_functional: Set(rng.r#gen()),
            // One slot past the end leaves the item without an owner.
            member_id: Set(member_ids.get(rng.gen_range(0..=member_ids.len())).copied()),
            ..Default::default()
        })
        .collect();
    equipment::Entity::insert_many(items).exec(&txn).await?;
    tracing::info!(count = EQUIPMENT_COUNT, "Generated equipment");

    txn.commit().await?;

    Ok(SeedSummary {
        removed,
        members: member_ids.len(),
        dives: DIVE_COUNT,
        equipment: EQUIPMENT_COUNT,
    })
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_before() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(days_before(today, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(days_before(today, 365), NaiveDate::from_ymd_opt(2023, 3, 2).unwrap());
    }

    #[test]
    fn test_certifications_cycle() {
        let assigned: Vec<_> = (0..MEMBER_COUNT)
            .map(|i| CERTIFICATIONS[i % CERTIFICATIONS.len()])
            .collect();
        assert_eq!(assigned[0], "Open Water");
        assert_eq!(assigned[4], "Advanced");
        assert_eq!(assigned[8], "Rescue Diver");
    }
}
