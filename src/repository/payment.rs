use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment::{NewPayment, Payment, PaymentChanges};
use crate::domain::types::PaymentId;
use crate::models::payment::{
    NewPayment as DbNewPayment, Payment as DbPayment, PaymentChanges as DbPaymentChanges,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    DeletedFilter, DieselRepository, PaymentListQuery, PaymentReader, PaymentWriter, scoped,
    soft_delete_rows,
};

impl PaymentReader for DieselRepository {
    fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<Payment>)> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = scoped!(
                payments::table.into_boxed::<diesel::sqlite::Sqlite>(),
                payments,
                query.filter
            );
            if let Some(cart_id) = query.cart_id {
                items = items.filter(payments::cart_id.eq(cart_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .order(payments::id.asc())
            .load::<DbPayment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Payment>, _>>()?;

        Ok((total, items))
    }

    fn get_payment_by_id(
        &self,
        id: PaymentId,
        filter: DeletedFilter,
    ) -> RepositoryResult<Option<Payment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let payment = scoped!(
            payments::table.into_boxed::<diesel::sqlite::Sqlite>(),
            payments,
            filter
        )
        .filter(payments::id.eq(id.get()))
        .first::<DbPayment>(&mut conn)
        .optional()?;

        let payment = payment.map(TryInto::try_into).transpose()?;
        Ok(payment)
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let db_payment: DbNewPayment = payment.clone().into();

        let created = diesel::insert_into(payments::table)
            .values(db_payment)
            .get_result::<DbPayment>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_payment(
        &self,
        id: PaymentId,
        changes: PaymentChanges,
        paid_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let mut db_changes: DbPaymentChanges = changes.into();
        db_changes.paid_at = paid_at;

        let updated = diesel::update(payments::table.filter(payments::id.eq(id.get())))
            .set((db_changes, payments::updated_at.eq(diesel::dsl::now)))
            .get_result::<DbPayment>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn soft_delete_payment(&self, id: PaymentId) -> RepositoryResult<usize> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let affected = soft_delete_rows!(&mut conn, payments, payments::id.eq(id.get()))?;

        Ok(affected)
    }
}
