use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: String,

    /// Decimal text, exactly as submitted
    pub price: String,

    pub address: String,

    pub city: String,

    pub lat: String,

    pub lng: String,

    pub bedrooms: i32,

    pub bathrooms: i32,

    pub square_feet: i32,

    pub year_built: Option<i32>,

    pub property_type: String,

    /// "buy" or "rent"
    pub listing_type: String,

    pub image_url: String,

    pub user_id: i32,

    pub featured: bool,

    pub status: String,

    pub avg_rating: String,

    pub rating_count: i32,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::appointments::Entity")]
    Appointments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
