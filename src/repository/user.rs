use diesel::prelude::*;

use crate::domain::customer::Customer;
use crate::domain::types::UserId;
use crate::domain::user::{NewUser, User};
use crate::models::customer::Customer as DbCustomer;
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DeletedFilter, DieselRepository, UserReader, UserWriter, scoped};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId, filter: DeletedFilter) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = scoped!(
            users::table.into_boxed::<diesel::sqlite::Sqlite>(),
            users,
            filter
        )
        .filter(users::id.eq(id.get()))
        .first::<DbUser>(&mut conn)
        .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_user_with_credential(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<(User, String)>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username))
            .filter(users::is_deleted.eq(false))
            .first::<DbUser>(&mut conn)
            .optional()?;

        match user {
            Some(user) => {
                let password_hash = user.password_hash.clone();
                Ok(Some((user.try_into()?, password_hash)))
            }
            None => Ok(None),
        }
    }
}

impl UserWriter for DieselRepository {
    fn create_user_with_customer(&self, user: &NewUser) -> RepositoryResult<(User, Customer)> {
        use crate::schema::{customers, users};

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        let (user, customer) = conn.transaction(|conn| {
            let user = diesel::insert_into(users::table)
                .values(db_user)
                .get_result::<DbUser>(conn)?;

            let customer = diesel::insert_into(customers::table)
                .values((
                    customers::user_id.eq(user.id),
                    customers::created_at.eq(user.created_at),
                    customers::updated_at.eq(user.updated_at),
                ))
                .get_result::<DbCustomer>(conn)?;

            Ok::<_, diesel::result::Error>((user, customer))
        })?;

        Ok((user.try_into()?, customer.try_into()?))
    }
}
