use diesel::prelude::*;

use crate::domain::customer::{Customer, CustomerChanges, NewCustomer};
use crate::domain::types::{CustomerId, UserId};
use crate::models::customer::{
    Customer as DbCustomer, CustomerChanges as DbCustomerChanges, NewCustomer as DbNewCustomer,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CustomerListQuery, CustomerReader, CustomerWriter, DeletedFilter, DieselRepository, scoped,
    soft_delete_rows,
};

impl CustomerReader for DieselRepository {
    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<Customer>)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let query_builder = || {
            scoped!(
                customers::table.into_boxed::<diesel::sqlite::Sqlite>(),
                customers,
                query.filter
            )
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order(customers::id.asc())
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Customer>, _>>()?;

        Ok((total, items))
    }

    fn get_customer_by_id(
        &self,
        id: CustomerId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let customer = scoped!(
            customers::table.into_boxed::<diesel::sqlite::Sqlite>(),
            customers,
            filter
        )
        .filter(customers::id.eq(id.get()))
        .first::<DbCustomer>(&mut conn)
        .optional()?;

        let customer = customer.map(TryInto::try_into).transpose()?;
        Ok(customer)
    }

    fn get_customer_by_user_id(
        &self,
        user_id: UserId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let customer = scoped!(
            customers::table.into_boxed::<diesel::sqlite::Sqlite>(),
            customers,
            filter
        )
        .filter(customers::user_id.eq(user_id.get()))
        .first::<DbCustomer>(&mut conn)
        .optional()?;

        let customer = customer.map(TryInto::try_into).transpose()?;
        Ok(customer)
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, customer: &NewCustomer) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let db_customer: DbNewCustomer = customer.clone().into();

        let created = diesel::insert_into(customers::table)
            .values(db_customer)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let db_changes: DbCustomerChanges = changes.into();

        let updated = diesel::update(customers::table.filter(customers::id.eq(id.get())))
            .set((db_changes, customers::updated_at.eq(diesel::dsl::now)))
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn soft_delete_customer(&self, id: CustomerId) -> RepositoryResult<usize> {
        use crate::schema::{cart_items, carts, customers};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            soft_delete_rows!(
                conn,
                cart_items,
                cart_items::cart_id.eq_any(
                    carts::table
                        .filter(carts::customer_id.eq(id.get()))
                        .select(carts::id),
                )
            )?;
            soft_delete_rows!(conn, carts, carts::customer_id.eq(id.get()))?;
            soft_delete_rows!(conn, customers, customers::id.eq(id.get()))
        })?;

        Ok(affected)
    }
}
