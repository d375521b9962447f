use diesel::prelude::*;

use crate::domain::meme::{Meme, NewMeme};
use crate::domain::types::{MemeId, UserId};
use crate::models::meme::{Meme as DbMeme, NewMeme as DbNewMeme};
use crate::repository::{DieselRepository, MemeReader, MemeWriter, RepositoryResult};

impl MemeReader for DieselRepository {
    fn list_memes(&self, user_id: UserId) -> RepositoryResult<Vec<Meme>> {
        use crate::schema::memes;

        let mut conn = self.conn()?;

        let items = memes::table
            .filter(memes::user_id.eq(user_id.get()))
            .order((memes::created_at.desc(), memes::id.desc()))
            .load::<DbMeme>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Meme>, _>>()?;

        Ok(items)
    }

    fn count_memes(&self, user_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::memes;

        let mut conn = self.conn()?;

        let total = memes::table
            .filter(memes::user_id.eq(user_id.get()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        Ok(total)
    }

    fn get_meme_by_id(&self, id: MemeId, user_id: UserId) -> RepositoryResult<Option<Meme>> {
        use crate::schema::memes;

        let mut conn = self.conn()?;

        let meme = memes::table
            .filter(memes::id.eq(id.get()))
            .filter(memes::user_id.eq(user_id.get()))
            .first::<DbMeme>(&mut conn)
            .optional()?;

        Ok(meme.map(TryInto::try_into).transpose()?)
    }
}

impl MemeWriter for DieselRepository {
    fn create_meme(&self, meme: &NewMeme) -> RepositoryResult<Meme> {
        use crate::schema::memes;

        let mut conn = self.conn()?;
        let db_meme: DbNewMeme = meme.into();

        let created = diesel::insert_into(memes::table)
            .values(db_meme)
            .get_result::<DbMeme>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn delete_meme(&self, id: MemeId, user_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::memes;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            memes::table
                .filter(memes::id.eq(id.get()))
                .filter(memes::user_id.eq(user_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
