use crate::{db_core::prelude::*, error::AppResult};

pub struct MailboxCtrl;

impl MailboxCtrl {
    pub async fn all_active(conn: &DatabaseConnection) -> AppResult<Vec<mailbox::Model>> {
        let mailboxes = Mailbox::find()
            .filter(mailbox::Column::Active.eq(true))
            .all(conn)
            .await?;

        Ok(mailboxes)
    }

    pub async fn find_by_address(
        conn: &DatabaseConnection,
        address: &str,
    ) -> AppResult<Option<mailbox::Model>> {
        let found = Mailbox::find()
            .filter(mailbox::Column::Address.eq(address))
            .one(conn)
            .await?;

        Ok(found)
    }
}
