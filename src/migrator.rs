use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_accounts::Migration),
            Box::new(m20240301_000002_create_taxonomy::Migration),
            Box::new(m20240301_000003_create_products::Migration),
            Box::new(m20240301_000004_create_favorites_and_themes::Migration),
        ]
    }
}

fn id_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

mod m20240301_000001_create_accounts {
    use super::id_column;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_accounts"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(&mut id_column(Users::Id))
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                        .col(
                            ColumnDef::new(Users::FirstName)
                                .string_len(150)
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Users::LastName)
                                .string_len(150)
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Factories::Table)
                        .if_not_exists()
                        .col(&mut id_column(Factories::Id))
                        .col(
                            ColumnDef::new(Factories::UserId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Factories::Name).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Factories::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Factories::Address).string_len(300).not_null())
                        .col(ColumnDef::new(Factories::Phone).string_len(20).not_null())
                        .col(ColumnDef::new(Factories::Email).string_len(254).not_null())
                        .col(
                            ColumnDef::new(Factories::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Factories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_factories_user")
                                .from(Factories::Table, Factories::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Factories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(crate) enum Users {
        Table,
        Id,
        Username,
        Email,
        FirstName,
        LastName,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(crate) enum Factories {
        Table,
        Id,
        UserId,
        Name,
        Description,
        Address,
        Phone,
        Email,
        IsVerified,
        CreatedAt,
    }
}

mod m20240301_000002_create_taxonomy {
    use super::id_column;
    use super::m20240301_000001_create_accounts::Factories;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_taxonomy"
        }
    }

    /// name + unique slug + description, shared by colors, styles and coatings
    fn slugged_table<T: IntoIden + Copy + 'static>(
        table: T,
        id: T,
        name: T,
        slug: T,
        description: T,
    ) -> TableCreateStatement {
        Table::create()
            .table(table)
            .if_not_exists()
            .col(&mut id_column(id))
            .col(ColumnDef::new(name).string_len(100).not_null())
            .col(ColumnDef::new(slug).string_len(100).not_null().unique_key())
            .col(ColumnDef::new(description).text().not_null().default(""))
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(&mut id_column(Categories::Id))
                        .col(ColumnDef::new(Categories::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Categories::Slug)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Categories::ParentId).integer().null())
                        .col(ColumnDef::new(Categories::FactoryId).integer().null())
                        .col(
                            ColumnDef::new(Categories::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Categories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Categories::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_parent")
                                .from(Categories::Table, Categories::ParentId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_factory")
                                .from(Categories::Table, Categories::FactoryId)
                                .to(Factories::Table, Factories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_categories_parent_id")
                        .table(Categories::Table)
                        .col(Categories::ParentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Materials::Table)
                        .if_not_exists()
                        .col(&mut id_column(Materials::Id))
                        .col(ColumnDef::new(Materials::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Materials::MaterialType)
                                .string_len(20)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Purities::Table)
                        .if_not_exists()
                        .col(&mut id_column(Purities::Id))
                        .col(
                            ColumnDef::new(Purities::MaterialType)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Purities::Value).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Purities::System)
                                .string_len(50)
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Purities::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_purities_material_value")
                        .table(Purities::Table)
                        .col(Purities::MaterialType)
                        .col(Purities::Value)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(slugged_table(
                    MetalColors::Table,
                    MetalColors::Id,
                    MetalColors::Name,
                    MetalColors::Slug,
                    MetalColors::Description,
                ))
                .await?;

            manager
                .create_table(slugged_table(
                    Styles::Table,
                    Styles::Id,
                    Styles::Name,
                    Styles::Slug,
                    Styles::Description,
                ))
                .await?;

            manager
                .create_table(slugged_table(
                    Coatings::Table,
                    Coatings::Id,
                    Coatings::Name,
                    Coatings::Slug,
                    Coatings::Description,
                ))
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InsertTypes::Table)
                        .if_not_exists()
                        .col(&mut id_column(InsertTypes::Id))
                        .col(ColumnDef::new(InsertTypes::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(InsertTypes::Slug)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(InsertTypes::Category)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InsertTypes::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InsertTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Coatings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Styles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MetalColors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Purities::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Materials::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(crate) enum Categories {
        Table,
        Id,
        Name,
        Slug,
        ParentId,
        FactoryId,
        Description,
        IsActive,
        SortOrder,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(crate) enum Materials {
        Table,
        Id,
        Name,
        MaterialType,
    }

    #[derive(DeriveIden)]
    pub(crate) enum Purities {
        Table,
        Id,
        MaterialType,
        Value,
        System,
        Description,
    }

    #[derive(DeriveIden, Clone, Copy)]
    pub(crate) enum MetalColors {
        Table,
        Id,
        Name,
        Slug,
        Description,
    }

    #[derive(DeriveIden, Clone, Copy)]
    pub(crate) enum Styles {
        Table,
        Id,
        Name,
        Slug,
        Description,
    }

    #[derive(DeriveIden, Clone, Copy)]
    pub(crate) enum Coatings {
        Table,
        Id,
        Name,
        Slug,
        Description,
    }

    #[derive(DeriveIden)]
    pub(crate) enum InsertTypes {
        Table,
        Id,
        Name,
        Slug,
        Category,
        Description,
    }
}

mod m20240301_000003_create_products {
    use super::id_column;
    use super::m20240301_000001_create_accounts::Factories;
    use super::m20240301_000002_create_taxonomy::{
        Categories, Coatings, InsertTypes, Materials, MetalColors, Purities, Styles,
    };
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_products"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(&mut id_column(Products::Id))
                        .col(ColumnDef::new(Products::FactoryId).integer().not_null())
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Products::MaterialId).integer().not_null())
                        .col(ColumnDef::new(Products::PurityId).integer().null())
                        .col(ColumnDef::new(Products::MetalColorId).integer().null())
                        .col(ColumnDef::new(Products::StyleId).integer().null())
                        .col(ColumnDef::new(Products::Name).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Products::Article)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Products::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Products::Price).decimal_len(10, 2).not_null())
                        .col(
                            ColumnDef::new(Products::StockQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::MetalWeight)
                                .decimal_len(8, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::TotalWeight).decimal_len(8, 2).null())
                        .col(ColumnDef::new(Products::Size).string_len(50).null())
                        .col(ColumnDef::new(Products::LengthMm).decimal_len(8, 2).null())
                        .col(ColumnDef::new(Products::WidthMm).decimal_len(8, 2).null())
                        .col(ColumnDef::new(Products::HeightMm).decimal_len(8, 2).null())
                        .col(
                            ColumnDef::new(Products::HasInserts)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::InsertDescription)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Products::HasStamp)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::ManufacturerBrand)
                                .string_len(100)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Products::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Products::ViewsCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_factory")
                                .from(Products::Table, Products::FactoryId)
                                .to(Factories::Table, Factories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_material")
                                .from(Products::Table, Products::MaterialId)
                                .to(Materials::Table, Materials::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_purity")
                                .from(Products::Table, Products::PurityId)
                                .to(Purities::Table, Purities::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_metal_color")
                                .from(Products::Table, Products::MetalColorId)
                                .to(MetalColors::Table, MetalColors::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_style")
                                .from(Products::Table, Products::StyleId)
                                .to(Styles::Table, Styles::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_active")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .col(Products::IsActive)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_factory_active")
                        .table(Products::Table)
                        .col(Products::FactoryId)
                        .col(Products::IsActive)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductInsertTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductInsertTypes::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductInsertTypes::InsertTypeId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(ProductInsertTypes::ProductId)
                                .col(ProductInsertTypes::InsertTypeId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_insert_types_product")
                                .from(ProductInsertTypes::Table, ProductInsertTypes::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_insert_types_insert_type")
                                .from(ProductInsertTypes::Table, ProductInsertTypes::InsertTypeId)
                                .to(InsertTypes::Table, InsertTypes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductCoatings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductCoatings::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCoatings::CoatingId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(ProductCoatings::ProductId)
                                .col(ProductCoatings::CoatingId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_coatings_product")
                                .from(ProductCoatings::Table, ProductCoatings::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_coatings_coating")
                                .from(ProductCoatings::Table, ProductCoatings::CoatingId)
                                .to(Coatings::Table, Coatings::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductImages::Table)
                        .if_not_exists()
                        .col(&mut id_column(ProductImages::Id))
                        .col(ColumnDef::new(ProductImages::ProductId).integer().not_null())
                        .col(ColumnDef::new(ProductImages::Image).string_len(500).not_null())
                        .col(
                            ColumnDef::new(ProductImages::IsMain)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductImages::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductImages::UploadedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_images_product")
                                .from(ProductImages::Table, ProductImages::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(FactoryArticleSequences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FactoryArticleSequences::FactoryId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(FactoryArticleSequences::LastValue)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_article_sequences_factory")
                                .from(
                                    FactoryArticleSequences::Table,
                                    FactoryArticleSequences::FactoryId,
                                )
                                .to(Factories::Table, Factories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FactoryArticleSequences::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductImages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductCoatings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductInsertTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(crate) enum Products {
        Table,
        Id,
        FactoryId,
        CategoryId,
        MaterialId,
        PurityId,
        MetalColorId,
        StyleId,
        Name,
        Article,
        Description,
        Price,
        StockQuantity,
        MetalWeight,
        TotalWeight,
        Size,
        LengthMm,
        WidthMm,
        HeightMm,
        HasInserts,
        InsertDescription,
        HasStamp,
        ManufacturerBrand,
        IsActive,
        ViewsCount,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductInsertTypes {
        Table,
        ProductId,
        InsertTypeId,
    }

    #[derive(DeriveIden)]
    enum ProductCoatings {
        Table,
        ProductId,
        CoatingId,
    }

    #[derive(DeriveIden)]
    enum ProductImages {
        Table,
        Id,
        ProductId,
        Image,
        IsMain,
        SortOrder,
        UploadedAt,
    }

    #[derive(DeriveIden)]
    enum FactoryArticleSequences {
        Table,
        FactoryId,
        LastValue,
    }
}

mod m20240301_000004_create_favorites_and_themes {
    use super::id_column;
    use super::m20240301_000001_create_accounts::Users;
    use super::m20240301_000003_create_products::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_favorites_and_themes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FavoriteLists::Table)
                        .if_not_exists()
                        .col(&mut id_column(FavoriteLists::Id))
                        .col(ColumnDef::new(FavoriteLists::UserId).integer().not_null())
                        .col(ColumnDef::new(FavoriteLists::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(FavoriteLists::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(FavoriteLists::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_favorite_lists_user")
                                .from(FavoriteLists::Table, FavoriteLists::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_favorite_lists_user_name")
                        .table(FavoriteLists::Table)
                        .col(FavoriteLists::UserId)
                        .col(FavoriteLists::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Favorites::Table)
                        .if_not_exists()
                        .col(&mut id_column(Favorites::Id))
                        .col(ColumnDef::new(Favorites::UserId).integer().not_null())
                        .col(ColumnDef::new(Favorites::ProductId).integer().not_null())
                        .col(ColumnDef::new(Favorites::ListId).integer().not_null())
                        .col(
                            ColumnDef::new(Favorites::AddedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_favorites_user")
                                .from(Favorites::Table, Favorites::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_favorites_product")
                                .from(Favorites::Table, Favorites::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_favorites_list")
                                .from(Favorites::Table, Favorites::ListId)
                                .to(FavoriteLists::Table, FavoriteLists::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_favorites_list_product")
                        .table(Favorites::Table)
                        .col(Favorites::ListId)
                        .col(Favorites::ProductId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Themes::Table)
                        .if_not_exists()
                        .col(&mut id_column(Themes::Id))
                        .col(
                            ColumnDef::new(Themes::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Themes::UserId).integer().null())
                        .col(
                            ColumnDef::new(Themes::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Themes::IsActive)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Themes::PrimaryColor).string_len(7).not_null())
                        .col(
                            ColumnDef::new(Themes::SecondaryColor)
                                .string_len(7)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Themes::ColorScheme).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Themes::GradientEnabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Themes::SharpCorners)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Themes::HeadingFont).string_len(100).not_null())
                        .col(ColumnDef::new(Themes::BodyFont).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Themes::HeadingFontWeight)
                                .integer()
                                .not_null()
                                .default(700),
                        )
                        .col(
                            ColumnDef::new(Themes::BodyFontWeight)
                                .integer()
                                .not_null()
                                .default(400),
                        )
                        .col(
                            ColumnDef::new(Themes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Themes::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_themes_user")
                                .from(Themes::Table, Themes::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Themes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Favorites::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FavoriteLists::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FavoriteLists {
        Table,
        Id,
        UserId,
        Name,
        IsDefault,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Favorites {
        Table,
        Id,
        UserId,
        ProductId,
        ListId,
        AddedAt,
    }

    #[derive(DeriveIden)]
    enum Themes {
        Table,
        Id,
        Name,
        UserId,
        IsDefault,
        IsActive,
        PrimaryColor,
        SecondaryColor,
        ColorScheme,
        GradientEnabled,
        SharpCorners,
        HeadingFont,
        BodyFont,
        HeadingFontWeight,
        BodyFontWeight,
        CreatedAt,
        UpdatedAt,
    }
}
