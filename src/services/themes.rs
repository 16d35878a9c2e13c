use crate::{
    entities::theme::{self, Entity as Theme, Model as ThemeModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

pub const DEFAULT_THEME_NAME: &str = "AuRoom Default";

/// Every editable theme attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDraft {
    pub name: String,
    pub is_default: bool,
    pub is_active: bool,
    pub primary_color: String,
    pub secondary_color: String,
    pub color_scheme: String,
    pub gradient_enabled: bool,
    pub sharp_corners: bool,
    pub heading_font: String,
    pub body_font: String,
    pub heading_font_weight: i32,
    pub body_font_weight: i32,
}

impl ThemeDraft {
    /// The stock storefront look.
    pub fn stock_default() -> Self {
        Self {
            name: DEFAULT_THEME_NAME.to_string(),
            is_default: true,
            is_active: false,
            primary_color: "#6366f1".to_string(),
            secondary_color: "#8b5cf6".to_string(),
            color_scheme: "indigo".to_string(),
            gradient_enabled: true,
            sharp_corners: false,
            heading_font: "Playfair Display".to_string(),
            body_font: "Inter".to_string(),
            heading_font_weight: 700,
            body_font_weight: 400,
        }
    }
}

impl From<&ThemeModel> for ThemeDraft {
    fn from(model: &ThemeModel) -> Self {
        Self {
            name: model.name.clone(),
            is_default: model.is_default,
            is_active: model.is_active,
            primary_color: model.primary_color.clone(),
            secondary_color: model.secondary_color.clone(),
            color_scheme: model.color_scheme.clone(),
            gradient_enabled: model.gradient_enabled,
            sharp_corners: model.sharp_corners,
            heading_font: model.heading_font.clone(),
            body_font: model.body_font.clone(),
            heading_font_weight: model.heading_font_weight,
            body_font_weight: model.body_font_weight,
        }
    }
}

/// Theme persistence that keeps a single default and a single active theme.
///
/// Clearing the flag on competing rows and writing the theme itself happen in
/// one transaction. Activation is global, not per owner.
#[derive(Clone)]
pub struct ThemeService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ThemeService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Inserts (`id = None`) or updates a theme, enforcing both singleton flags.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn save(
        &self,
        id: Option<i32>,
        owner: Option<i32>,
        draft: ThemeDraft,
    ) -> Result<ThemeModel, ServiceError> {
        let txn = self.db.begin().await?;
        let saved = Self::save_in(&txn, id, owner, draft).await?;
        txn.commit().await?;

        metrics::counter!("auroom.themes.saved", 1);
        self.event_sender.send_or_log(Event::ThemeSaved {
            theme_id: saved.id,
            is_default: saved.is_default,
            is_active: saved.is_active,
        });
        info!(theme_id = saved.id, "theme saved");
        Ok(saved)
    }

    async fn save_in(
        txn: &DatabaseTransaction,
        id: Option<i32>,
        owner: Option<i32>,
        draft: ThemeDraft,
    ) -> Result<ThemeModel, ServiceError> {
        let existing = match id {
            Some(id) => Some(
                Theme::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("theme {id} not found")))?,
            ),
            None => None,
        };

        if let Some(current) = &existing {
            if current.is_default && !draft.is_default {
                return Err(ServiceError::InvalidOperation(
                    "the default theme cannot be unset; mark another theme as default instead"
                        .to_string(),
                ));
            }
        }

        let others = match id {
            Some(id) => Condition::all().add(theme::Column::Id.ne(id)),
            None => Condition::all(),
        };

        if draft.is_default {
            Theme::update_many()
                .col_expr(theme::Column::IsDefault, Expr::value(false))
                .filter(others.clone().add(theme::Column::IsDefault.eq(true)))
                .exec(txn)
                .await?;
        }
        if draft.is_active {
            Theme::update_many()
                .col_expr(theme::Column::IsActive, Expr::value(false))
                .filter(others.add(theme::Column::IsActive.eq(true)))
                .exec(txn)
                .await?;
        }

        let owner = if draft.is_default {
            None
        } else {
            existing.as_ref().map_or(owner, |current| current.user_id)
        };
        let now = Utc::now();

        let mut active: theme::ActiveModel = match existing {
            Some(current) => current.into(),
            None => theme::ActiveModel {
                created_at: Set(now),
                ..Default::default()
            },
        };
        active.name = Set(draft.name.trim().to_string());
        active.user_id = Set(owner);
        active.is_default = Set(draft.is_default);
        active.is_active = Set(draft.is_active);
        active.primary_color = Set(draft.primary_color);
        active.secondary_color = Set(draft.secondary_color);
        active.color_scheme = Set(draft.color_scheme);
        active.gradient_enabled = Set(draft.gradient_enabled);
        active.sharp_corners = Set(draft.sharp_corners);
        active.heading_font = Set(draft.heading_font);
        active.body_font = Set(draft.body_font);
        active.heading_font_weight = Set(draft.heading_font_weight);
        active.body_font_weight = Set(draft.body_font_weight);
        active.updated_at = Set(now);

        let result = if id.is_some() {
            active.update(txn).await
        } else {
            active.insert(txn).await
        };
        result.map_err(|err| ServiceError::unique_or(err, "a theme with this name already exists"))
    }

    /// Deletes a theme; the default theme is protected.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let theme = self.get(id).await?;
        if theme.is_default {
            return Err(ServiceError::ProtectedEntity(
                "the default theme cannot be deleted".to_string(),
            ));
        }
        Theme::delete_by_id(id).exec(&*self.db).await?;
        self.event_sender.send_or_log(Event::ThemeDeleted(id));
        Ok(())
    }

    /// Makes `id` the only active theme.
    #[instrument(skip(self))]
    pub async fn activate(&self, id: i32) -> Result<ThemeModel, ServiceError> {
        let theme = self.get(id).await?;
        let mut draft = ThemeDraft::from(&theme);
        draft.is_active = true;
        self.save(Some(id), theme.user_id, draft).await
    }

    /// Creates the stock default theme unless some theme is already the default.
    #[instrument(skip(self))]
    pub async fn ensure_default_theme(&self) -> Result<ThemeModel, ServiceError> {
        if let Some(theme) = self.default_theme().await? {
            return Ok(theme);
        }

        let mut draft = ThemeDraft::stock_default();
        if let Some(taken) = Theme::find()
            .filter(theme::Column::Name.eq(DEFAULT_THEME_NAME))
            .one(&*self.db)
            .await?
        {
            // A non-default row already holds the stock name: promote it.
            draft = ThemeDraft::from(&taken);
            draft.is_default = true;
            return self.save(Some(taken.id), None, draft).await;
        }
        draft.is_active = self.active_theme().await?.is_none();
        info!("creating stock default theme");
        self.save(None, None, draft).await
    }

    pub async fn get(&self, id: i32) -> Result<ThemeModel, ServiceError> {
        Theme::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("theme {id} not found")))
    }

    /// A theme `user_id` may change: unowned themes or the caller's own.
    /// Someone else's theme reads as missing.
    pub async fn editable_by(&self, id: i32, user_id: i32) -> Result<ThemeModel, ServiceError> {
        let theme = self.get(id).await?;
        match theme.user_id {
            Some(owner) if owner != user_id => {
                Err(ServiceError::NotFound(format!("theme {id} not found")))
            }
            _ => Ok(theme),
        }
    }

    pub async fn default_theme(&self) -> Result<Option<ThemeModel>, ServiceError> {
        Ok(Theme::find()
            .filter(theme::Column::IsDefault.eq(true))
            .one(&*self.db)
            .await?)
    }

    pub async fn active_theme(&self) -> Result<Option<ThemeModel>, ServiceError> {
        Ok(Theme::find()
            .filter(theme::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?)
    }

    /// The default theme followed by the caller's own themes.
    pub async fn visible_to(&self, user_id: Option<i32>) -> Result<Vec<ThemeModel>, ServiceError> {
        let mut condition = Condition::any().add(theme::Column::IsDefault.eq(true));
        if let Some(user_id) = user_id {
            condition = condition.add(theme::Column::UserId.eq(user_id));
        }
        Ok(Theme::find()
            .filter(condition)
            .order_by_desc(theme::Column::IsDefault)
            .order_by_asc(theme::Column::Name)
            .all(&*self.db)
            .await?)
    }
}
