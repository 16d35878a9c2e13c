//! Per-factory article codes of the form `{factory_id}-{sequence:06}`.

use crate::entities::{factory_article_sequence, product};
use crate::errors::ServiceError;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

/// Attempts made when a generated code collides with a manually entered one.
pub const MAX_ARTICLE_ATTEMPTS: usize = 3;

pub fn format_article(factory_id: i32, sequence: i32) -> String {
    format!("{}-{:06}", factory_id, sequence)
}

/// Sequence encoded in an article code, if the code follows the generated format.
pub fn parse_sequence(code: &str) -> Option<i32> {
    let (_, suffix) = code.rsplit_once('-')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Next sequence derived from the most recently created product's code.
/// A missing or malformed code starts over at 1.
pub fn legacy_next_sequence(last_code: Option<&str>) -> i32 {
    last_code
        .and_then(parse_sequence)
        .and_then(|seq| seq.checked_add(1))
        .unwrap_or(1)
}

/// Reserves the next article code for `factory_id`.
///
/// The counter row is incremented with a single upsert, so concurrent callers
/// never receive the same sequence. The first allocation for a factory seeds
/// the counter from its newest existing product.
pub async fn next_article<C>(conn: &C, factory_id: i32) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    let existing = factory_article_sequence::Entity::find_by_id(factory_id)
        .one(conn)
        .await?;

    let seed = match existing {
        Some(_) => 1,
        None => {
            let last = product::Entity::find()
                .filter(product::Column::FactoryId.eq(factory_id))
                .order_by_desc(product::Column::CreatedAt)
                .order_by_desc(product::Column::Id)
                .one(conn)
                .await?;
            legacy_next_sequence(last.as_ref().map(|p| p.article.as_str()))
        }
    };

    factory_article_sequence::Entity::insert(factory_article_sequence::ActiveModel {
        factory_id: Set(factory_id),
        last_value: Set(seed),
    })
    .on_conflict(
        OnConflict::column(factory_article_sequence::Column::FactoryId)
            .value(
                factory_article_sequence::Column::LastValue,
                Expr::col((
                    factory_article_sequence::Entity,
                    factory_article_sequence::Column::LastValue,
                ))
                .add(1),
            )
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    let row = factory_article_sequence::Entity::find_by_id(factory_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!("article counter missing for factory {factory_id}"))
        })?;

    metrics::counter!("auroom.articles.allocated", 1);
    debug!(factory_id, sequence = row.last_value, "allocated article sequence");
    Ok(format_article(factory_id, row.last_value))
}
