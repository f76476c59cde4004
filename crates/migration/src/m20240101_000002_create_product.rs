//! Create `product` table with FK to `category`.
//!
//! `picture` holds the zlib-compressed image bytes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(big_integer(Product::Id).primary_key().auto_increment())
                    .col(string_len(Product::Name, 128).not_null())
                    .col(integer(Product::Price).not_null())
                    .col(integer(Product::Quantity).not_null())
                    .col(ColumnDef::new(Product::Picture).blob().not_null())
                    .col(big_integer(Product::CategoryId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Price,
    Quantity,
    Picture,
    CategoryId,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
