use crate::entities::agents;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Profiles shown on the landing page before any agent signs up.
const SEED_AGENTS: &[(&str, &str, &str, i32, &str)] = &[
    (
        "Sarah Johnson",
        "Luxury Homes",
        "4.9",
        124,
        "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2",
    ),
    (
        "Michael Chen",
        "First-Time Buyers",
        "4.8",
        98,
        "https://images.unsplash.com/photo-1560250097-0b93528c311a",
    ),
    (
        "Emily Rodriguez",
        "Rentals & Leasing",
        "4.7",
        156,
        "https://images.unsplash.com/photo-1580489944761-15a19d654956",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut insert = Query::insert()
            .into_table(Agents)
            .columns([
                agents::Column::Name,
                agents::Column::Specialization,
                agents::Column::Rating,
                agents::Column::PropertiesSold,
                agents::Column::ImageUrl,
                agents::Column::CreatedAt,
            ])
            .to_owned();

        for (name, specialization, rating, sold, image_url) in SEED_AGENTS {
            insert.values_panic([
                (*name).into(),
                (*specialization).into(),
                (*rating).into(),
                (*sold).into(),
                (*image_url).into(),
                now.clone().into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = SEED_AGENTS.iter().map(|(name, ..)| *name).collect();
        let delete = Query::delete()
            .from_table(Agents)
            .and_where(Expr::col(agents::Column::Name).is_in(names))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
