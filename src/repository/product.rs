use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::ProductId;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChanges as DbProductChanges,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    DeletedFilter, DieselRepository, ProductListQuery, ProductReader, ProductWriter, scoped,
    soft_delete_rows,
};

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = scoped!(
                products::table.into_boxed::<diesel::sqlite::Sqlite>(),
                products,
                query.filter
            );
            if let Some(category_id) = query.category_id {
                items = items.filter(products::category_id.eq(category_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order(products::name.asc())
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok((total, items))
    }

    fn get_product_by_id(
        &self,
        id: ProductId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = scoped!(
            products::table.into_boxed::<diesel::sqlite::Sqlite>(),
            products,
            filter
        )
        .filter(products::id.eq(id.get()))
        .first::<DbProduct>(&mut conn)
        .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let created = diesel::insert_into(products::table)
            .values(db_product)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, changes: ProductChanges) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_changes: DbProductChanges = changes.into();

        let updated = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set((db_changes, products::updated_at.eq(diesel::dsl::now)))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn soft_delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::{cart_items, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            soft_delete_rows!(conn, cart_items, cart_items::product_id.eq(id.get()))?;
            soft_delete_rows!(conn, products, products::id.eq(id.get()))
        })?;

        Ok(affected)
    }
}
