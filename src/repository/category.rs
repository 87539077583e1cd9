use diesel::prelude::*;

use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{
    Category as DbCategory, CategoryChanges as DbCategoryChanges, NewCategory as DbNewCategory,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, DeletedFilter, DieselRepository, scoped,
    soft_delete_rows,
};

impl CategoryReader for DieselRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let query_builder = || {
            scoped!(
                categories::table.into_boxed::<diesel::sqlite::Sqlite>(),
                categories,
                query.filter
            )
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok((total, items))
    }

    fn get_category_by_id(
        &self,
        id: CategoryId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = scoped!(
            categories::table.into_boxed::<diesel::sqlite::Sqlite>(),
            categories,
            filter
        )
        .filter(categories::id.eq(id.get()))
        .first::<DbCategory>(&mut conn)
        .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_changes: DbCategoryChanges = changes.into();

        let updated = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set((db_changes, categories::updated_at.eq(diesel::dsl::now)))
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn soft_delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{cart_items, categories, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            soft_delete_rows!(
                conn,
                cart_items,
                cart_items::product_id.eq_any(
                    products::table
                        .filter(products::category_id.eq(id.get()))
                        .select(products::id),
                )
            )?;
            soft_delete_rows!(conn, products, products::category_id.eq(id.get()))?;
            soft_delete_rows!(conn, categories, categories::id.eq(id.get()))
        })?;

        Ok(affected)
    }
}
