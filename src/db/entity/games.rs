use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    pub created_at: DateTimeUtc,
    pub completed_at: DateTimeUtc,
    pub player_count: i32,
    pub winner_name: Option<String>,
    /// `winner_name` folded to lowercase for name searches.
    pub winner_name_folded: Option<String>,
    pub winner_score: Option<i32>,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::players::Entity")]
    Players,
    #[sea_orm(has_many = "super::high_scores::Entity")]
    HighScores,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl Related<super::high_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HighScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
