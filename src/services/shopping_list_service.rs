use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QuerySelect, RelationTrait,
};
use std::collections::BTreeMap;

use crate::entities::membership::{self, MembershipKind};
use crate::entities::{ingredient, recipe, recipe_ingredient};
use crate::error::ServiceResult;

/// One raw ingredient line pulled from a shopping-cart recipe.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// One aggregated entry: total amount per (ingredient name, unit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub name: String,
    pub total_amount: i64,
    pub measurement_unit: String,
}

pub struct ShoppingListService;

impl ShoppingListService {
    /// Unions the ingredient lines of every recipe in the user's shopping
    /// cart and sums amounts per (name, unit), sorted by name. Reads the
    /// current state on every call; nothing is cached.
    pub async fn aggregate(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> ServiceResult<Vec<AggregatedLine>> {
        let lines = recipe_ingredient::Entity::find()
            .select_only()
            .column_as(ingredient::Column::Name, "name")
            .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
            .column(recipe_ingredient::Column::Amount)
            .join(
                JoinType::InnerJoin,
                recipe_ingredient::Relation::Ingredient.def(),
            )
            .join(JoinType::InnerJoin, recipe_ingredient::Relation::Recipe.def())
            .join(JoinType::InnerJoin, recipe::Relation::Membership.def())
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::Kind.eq(MembershipKind::ShoppingCart))
            .into_model::<CartLine>()
            .all(db)
            .await?;

        Ok(aggregate_lines(lines))
    }

    /// The downloadable plain-text rendering.
    pub async fn render_text(db: &DatabaseConnection, user_id: i64) -> ServiceResult<String> {
        let items = Self::aggregate(db, user_id).await?;
        Ok(render_shopping_list(&items))
    }
}

/// Groups lines by (name, unit) and sums amounts. BTreeMap keys keep the
/// output sorted by ingredient name.
pub fn aggregate_lines(lines: Vec<CartLine>) -> Vec<AggregatedLine> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += i64::from(line.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| AggregatedLine {
            name,
            total_amount,
            measurement_unit,
        })
        .collect()
}

pub fn render_shopping_list(items: &[AggregatedLine]) -> String {
    let mut out = String::from("Products to buy to cook selected dishes:\n\n");
    for item in items {
        out.push_str(&format!(
            "{} - {} {}\n",
            item.name, item.total_amount, item.measurement_unit
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, amount: i32) -> CartLine {
        CartLine {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn sums_per_ingredient_and_sorts_by_name() {
        // Cart holds R1 = {flour: 200 g} and R2 = {flour: 300 g, sugar: 50 g}
        let lines = vec![
            line("sugar", "g", 50),
            line("flour", "g", 200),
            line("flour", "g", 300),
        ];

        let result = aggregate_lines(lines);
        assert_eq!(
            result,
            vec![
                AggregatedLine {
                    name: "flour".to_string(),
                    total_amount: 500,
                    measurement_unit: "g".to_string(),
                },
                AggregatedLine {
                    name: "sugar".to_string(),
                    total_amount: 50,
                    measurement_unit: "g".to_string(),
                },
            ]
        );
    }

    #[test]
    fn same_name_different_units_stay_separate() {
        let lines = vec![line("milk", "ml", 200), line("milk", "l", 1)];
        let result = aggregate_lines(lines);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|i| i.name == "milk"));
    }

    #[test]
    fn empty_cart_renders_header_only() {
        let text = render_shopping_list(&[]);
        assert_eq!(text, "Products to buy to cook selected dishes:\n\n");
    }

    #[test]
    fn renders_one_line_per_group() {
        let items = aggregate_lines(vec![line("flour", "g", 200), line("flour", "g", 300)]);
        let text = render_shopping_list(&items);
        assert!(text.contains("flour - 500 g\n"));
    }
}
