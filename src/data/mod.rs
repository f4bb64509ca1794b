//! Repository layer: one repository struct per table, generic over
//! `ConnectionTrait` so callers can pass either the connection or an open
//! transaction.

pub mod alliance;
pub mod alliance_activation;
pub mod alliance_member;
pub mod event;
pub mod game_match;
pub mod pick_list;
pub mod record;
pub mod share_link;
pub mod shared_record;
pub mod sync_outbox;
pub mod team;
pub mod team_event;

use std::future::Future;

use sea_orm::{sea_query::SimpleExpr, ColumnTrait, DbErr, SqlErr};

/// Owner filter that treats `None` as the legacy null-owner rows instead
/// of generating a never-matching `= NULL` comparison.
pub fn owner_eq<Col: ColumnTrait>(col: Col, owner_number: Option<i32>) -> SimpleExpr {
    match owner_number {
        Some(number) => col.eq(number),
        None => col.is_null(),
    }
}

/// True when the error is a uniqueness-constraint violation, i.e. a
/// concurrent caller won an insert race.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Find-or-create with race retry: attempt the lookup, then the insert;
/// if the insert hits a uniqueness violation a concurrent caller won, so
/// re-run the lookup against the committed winner. The original error is
/// re-raised only if the winner still cannot be found.
///
/// Parameterized by (lookup predicate, constructor) so every natural-keyed
/// entity shares one implementation instead of duplicating the pattern.
pub async fn find_or_create<M, L, LFut, C, CFut>(lookup: L, create: C) -> Result<M, DbErr>
where
    L: Fn() -> LFut,
    LFut: Future<Output = Result<Option<M>, DbErr>>,
    C: FnOnce() -> CFut,
    CFut: Future<Output = Result<M, DbErr>>,
{
    if let Some(found) = lookup().await? {
        return Ok(found);
    }

    match create().await {
        Ok(created) => Ok(created),
        Err(err) if is_unique_violation(&err) => match lookup().await? {
            Some(winner) => Ok(winner),
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}
