//! Sea-ORM entities for formulas and their association tables.

/// The formulas table
pub mod formula {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "formulas")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub name: String,
        #[sea_orm(column_type = "Text")]
        pub description: String,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub product_type: String,
        pub batch_size: Option<f64>,
        #[sea_orm(column_type = "String(StringLen::N(20))", nullable)]
        pub batch_unit: Option<String>,
        pub total_weight: Option<f64>,
        pub is_public: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::formula_ingredient::Entity")]
        FormulaIngredients,
        #[sea_orm(has_many = "super::formula_step::Entity")]
        FormulaSteps,
    }

    impl Related<super::formula_ingredient::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::FormulaIngredients.def()
        }
    }

    impl Related<super::formula_step::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::FormulaSteps.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Formula {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                product_type: model.product_type,
                batch_size: model.batch_size,
                batch_unit: model.batch_unit,
                total_weight: model.total_weight,
                is_public: model.is_public,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<&crate::models::CreateFormula> for ActiveModel {
        fn from(input: &crate::models::CreateFormula) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(input.name.clone()),
                description: Set(input.description.clone()),
                product_type: Set(input.product_type.clone()),
                batch_size: Set(input.batch_size),
                batch_unit: Set(input.batch_unit.clone()),
                total_weight: Set(input.total_weight),
                is_public: Set(input.is_public),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

/// The formula_ingredients association table
pub mod formula_ingredient {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "formula_ingredients")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub formula_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub ingredient_id: Uuid,
        pub percentage: f64,
        pub sort_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::formula::Entity",
            from = "Column::FormulaId",
            to = "super::formula::Column::Id",
            on_delete = "Cascade"
        )]
        Formula,
    }

    impl Related<super::formula::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Formula.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::FormulaIngredient {
        fn from(model: Model) -> Self {
            Self {
                ingredient_id: model.ingredient_id,
                percentage: model.percentage,
                sort_order: model.sort_order,
            }
        }
    }
}

/// The formula_steps table
pub mod formula_step {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "formula_steps")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub formula_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub sort_order: i32,
        #[sea_orm(column_type = "Text")]
        pub description: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::formula::Entity",
            from = "Column::FormulaId",
            to = "super::formula::Column::Id",
            on_delete = "Cascade"
        )]
        Formula,
    }

    impl Related<super::formula::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Formula.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::FormulaStep {
        fn from(model: Model) -> Self {
            Self {
                description: model.description,
                sort_order: model.sort_order,
            }
        }
    }
}
