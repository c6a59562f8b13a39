use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::menu::{FoodItem, FoodItemInput};
use crate::domain::ports::MenuStore;
use crate::notify::{ChangeFeed, ChangeKind, Table};
use crate::schema::food_items;

use super::models::{FoodItemRow, NewFoodItemRow};

#[derive(Clone)]
pub struct DieselMenuStore {
    pool: DbPool,
    feed: ChangeFeed,
}

impl DieselMenuStore {
    pub fn new(pool: DbPool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }
}

impl MenuStore for DieselMenuStore {
    fn list_items(&self, only_available: bool) -> Result<Vec<FoodItem>, DomainError> {
        let mut conn = self.pool.get()?;
        let query = food_items::table
            .order(food_items::name.asc())
            .select(FoodItemRow::as_select());
        let rows: Vec<FoodItemRow> = if only_available {
            query
                .filter(food_items::is_available.eq(true))
                .load(&mut conn)?
        } else {
            query.load(&mut conn)?
        };
        Ok(rows.into_iter().map(FoodItem::from).collect())
    }

    fn insert_item(&self, input: FoodItemInput) -> Result<FoodItem, DomainError> {
        let mut conn = self.pool.get()?;
        let id = Uuid::new_v4();
        diesel::insert_into(food_items::table)
            .values(&NewFoodItemRow {
                id,
                name: input.name,
                category: input.category,
                price: input.price,
                is_available: input.is_available,
            })
            .execute(&mut conn)?;
        let row = food_items::table
            .filter(food_items::id.eq(id))
            .select(FoodItemRow::as_select())
            .first(&mut conn)?;
        self.feed.publish(Table::FoodItems, ChangeKind::Insert);
        Ok(row.into())
    }

    fn update_item(&self, id: Uuid, input: FoodItemInput) -> Result<FoodItem, DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(food_items::table.filter(food_items::id.eq(id)))
            .set((
                food_items::name.eq(input.name),
                food_items::category.eq(input.category),
                food_items::price.eq(input.price),
                food_items::is_available.eq(input.is_available),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound);
        }
        let row = food_items::table
            .filter(food_items::id.eq(id))
            .select(FoodItemRow::as_select())
            .first(&mut conn)?;
        self.feed.publish(Table::FoodItems, ChangeKind::Update);
        Ok(row.into())
    }

    fn delete_item(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(food_items::table.filter(food_items::id.eq(id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound);
        }
        self.feed.publish(Table::FoodItems, ChangeKind::Delete);
        Ok(())
    }
}
