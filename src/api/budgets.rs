use axum::Extension;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::budgets::Budget;
use crate::budgets::DEFAULT_CATEGORY;
use crate::database::CreateBudgetValues;
use crate::database::Database;
use crate::database::UpdateBudgetValues;
use crate::utils::generate_id;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::Message;
use super::PathParameters;
use super::Success;
use super::fields;
use super::utils::required;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: String,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub actual_amount: Decimal,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetResponse {
    fn from_budget(budget: Budget) -> Self {
        Self {
            id: budget.id,
            user_id: budget.user_id,
            name: budget.name,
            description: budget.description,
            amount: budget.amount,
            actual_amount: budget.actual_amount,
            category: budget.category,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }

    fn from_budget_multiple(budgets: Vec<Budget>) -> Vec<Self> {
        budgets.into_iter().map(Self::from_budget).collect::<Vec<Self>>()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForm {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "fields::decimal")]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "fields::decimal")]
    actual_amount: Option<Decimal>,
    category: Option<String>,
}

pub async fn list(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
) -> Result<Success<Vec<BudgetResponse>>, Error> {
    let budgets = database
        .find_all_budgets(&current_user)
        .await
        .map_err(Error::database)?;

    Ok(Success::ok(BudgetResponse::from_budget_multiple(budgets)))
}

pub async fn create(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    Form(form): Form<BudgetForm>,
) -> Result<Success<BudgetResponse>, Error> {
    let Some(name) = required(form.name) else {
        return Err(Error::bad_request("Name is required"));
    };

    let id = required(form.id).unwrap_or_else(generate_id);
    let category = required(form.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let budget = database
        .create_budget(&CreateBudgetValues {
            user: &current_user,
            id: &id,
            name: &name,
            description: form.description.as_deref(),
            amount: form.amount.unwrap_or_default(),
            actual_amount: form.actual_amount.unwrap_or_default(),
            category: &category,
        })
        .await
        .map_err(Error::database_or_conflict("Budget ID already exists"))?;

    Ok(Success::created(BudgetResponse::from_budget(budget)))
}

pub async fn update(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(budget_id): PathParameters<String>,
    Form(form): Form<BudgetForm>,
) -> Result<Success<BudgetResponse>, Error> {
    let name = required(form.name);
    let category = required(form.category);

    let budget = database
        .update_budget(
            &current_user,
            &budget_id,
            &UpdateBudgetValues {
                name: name.as_deref(),
                description: form.description.as_deref(),
                amount: form.amount,
                actual_amount: form.actual_amount,
                category: category.as_deref(),
            },
        )
        .await
        .map_err(Error::database)?
        .ok_or_else(|| Error::not_found("Budget not found"))?;

    Ok(Success::ok(BudgetResponse::from_budget(budget)))
}

pub async fn delete(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(budget_id): PathParameters<String>,
) -> Result<Success<Message>, Error> {
    let deleted = database
        .delete_budget(&current_user, &budget_id)
        .await
        .map_err(Error::database)?;

    if !deleted {
        return Err(Error::not_found("Budget not found"));
    }

    Ok(Success::message("Budget deleted"))
}
