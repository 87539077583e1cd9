use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::cart::{Cart, CartItem, NewCart, NewCartItem};
use crate::domain::types::{CartId, CartItemId, CustomerId, Quantity};
use crate::models::cart::{
    Cart as DbCart, CartItem as DbCartItem, NewCart as DbNewCart, NewCartItem as DbNewCartItem,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CartItemListQuery, CartListQuery, CartReader, CartWriter, DeletedFilter, DieselRepository,
    scoped, soft_delete_rows,
};

impl CartReader for DieselRepository {
    fn list_carts(&self, query: CartListQuery) -> RepositoryResult<(usize, Vec<Cart>)> {
        use crate::schema::carts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = scoped!(
                carts::table.into_boxed::<diesel::sqlite::Sqlite>(),
                carts,
                query.filter
            );
            if let Some(customer_id) = query.customer_id {
                items = items.filter(carts::customer_id.eq(customer_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order(carts::id.asc())
            .load::<DbCart>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Cart>, _>>()?;

        Ok((total, items))
    }

    fn get_cart_by_id(&self, id: CartId, filter: DeletedFilter) -> RepositoryResult<Option<Cart>> {
        use crate::schema::carts;

        let mut conn = self.conn()?;

        let cart = scoped!(
            carts::table.into_boxed::<diesel::sqlite::Sqlite>(),
            carts,
            filter
        )
        .filter(carts::id.eq(id.get()))
        .first::<DbCart>(&mut conn)
        .optional()?;

        let cart = cart.map(TryInto::try_into).transpose()?;
        Ok(cart)
    }

    fn list_cart_items(
        &self,
        query: CartItemListQuery,
    ) -> RepositoryResult<(usize, Vec<CartItem>)> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = scoped!(
                cart_items::table.into_boxed::<diesel::sqlite::Sqlite>(),
                cart_items,
                query.filter
            );
            if let Some(cart_id) = query.cart_id {
                items = items.filter(cart_items::cart_id.eq(cart_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order(cart_items::id.asc())
            .load::<DbCartItem>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<CartItem>, _>>()?;

        Ok((total, items))
    }

    fn get_cart_item_by_id(
        &self,
        id: CartItemId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<CartItem>> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let item = scoped!(
            cart_items::table.into_boxed::<diesel::sqlite::Sqlite>(),
            cart_items,
            filter
        )
        .filter(cart_items::id.eq(id.get()))
        .first::<DbCartItem>(&mut conn)
        .optional()?;

        let item = item.map(TryInto::try_into).transpose()?;
        Ok(item)
    }
}

impl CartWriter for DieselRepository {
    fn create_cart(&self, cart: &NewCart) -> RepositoryResult<Cart> {
        use crate::schema::carts;

        let mut conn = self.conn()?;
        let db_cart: DbNewCart = cart.clone().into();

        let created = diesel::insert_into(carts::table)
            .values(db_cart)
            .get_result::<DbCart>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_cart(&self, id: CartId, customer_id: CustomerId) -> RepositoryResult<Cart> {
        use crate::schema::carts;

        let mut conn = self.conn()?;

        let updated = diesel::update(carts::table.filter(carts::id.eq(id.get())))
            .set((
                carts::customer_id.eq(customer_id.get()),
                carts::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbCart>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn soft_delete_cart(&self, id: CartId) -> RepositoryResult<usize> {
        use crate::schema::{cart_items, carts};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            soft_delete_rows!(conn, cart_items, cart_items::cart_id.eq(id.get()))?;
            soft_delete_rows!(conn, carts, carts::id.eq(id.get()))
        })?;

        Ok(affected)
    }

    fn upsert_cart_item(&self, item: &NewCartItem) -> RepositoryResult<CartItem> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;
        let db_item: DbNewCartItem = item.clone().into();

        // One statement end to end; the unique index arbitrates concurrent
        // adds of the same product. A soft-deleted line is revived.
        let upserted = diesel::insert_into(cart_items::table)
            .values(db_item)
            .on_conflict((cart_items::cart_id, cart_items::product_id))
            .do_update()
            .set((
                cart_items::quantity.eq(cart_items::quantity + excluded(cart_items::quantity)),
                cart_items::is_deleted.eq(false),
                cart_items::updated_at.eq(excluded(cart_items::updated_at)),
            ))
            .get_result::<DbCartItem>(&mut conn)?;

        Ok(upserted.try_into()?)
    }

    fn set_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: Quantity,
    ) -> RepositoryResult<CartItem> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let updated = diesel::update(cart_items::table.filter(cart_items::id.eq(id.get())))
            .set((
                cart_items::quantity.eq(quantity.get()),
                cart_items::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbCartItem>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn soft_delete_cart_item(&self, id: CartItemId) -> RepositoryResult<usize> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let affected = soft_delete_rows!(&mut conn, cart_items, cart_items::id.eq(id.get()))?;

        Ok(affected)
    }
}
