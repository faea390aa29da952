use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::database::CreateMemoValues;
use crate::database::Database;
use crate::database::UpdateMemoValues;
use crate::memos::DEFAULT_TITLE;
use crate::memos::Memo;
use crate::utils::generate_id;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::Message;
use super::PathParameters;
use super::Success;
use super::utils::required;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoResponse {
    pub id: String,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MemoResponse {
    fn from_memo(memo: Memo) -> Self {
        Self {
            id: memo.id,
            user_id: memo.user_id,
            title: memo.title,
            content: memo.content,
            created_at: memo.created_at,
            updated_at: memo.updated_at,
        }
    }

    fn from_memo_multiple(memos: Vec<Memo>) -> Vec<Self> {
        memos.into_iter().map(Self::from_memo).collect::<Vec<Self>>()
    }
}

#[derive(Deserialize)]
pub struct MemoForm {
    id: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

pub async fn list(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
) -> Result<Success<Vec<MemoResponse>>, Error> {
    let memos = database
        .find_all_memos(&current_user)
        .await
        .map_err(Error::database)?;

    Ok(Success::ok(MemoResponse::from_memo_multiple(memos)))
}

pub async fn create(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    Form(form): Form<MemoForm>,
) -> Result<Success<MemoResponse>, Error> {
    let id = required(form.id).unwrap_or_else(generate_id);
    let title = required(form.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let memo = database
        .create_memo(&CreateMemoValues {
            user: &current_user,
            id: &id,
            title: &title,
            content: form.content.as_deref().unwrap_or_default(),
        })
        .await
        .map_err(Error::database_or_conflict("Memo ID already exists"))?;

    Ok(Success::created(MemoResponse::from_memo(memo)))
}

pub async fn update(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(memo_id): PathParameters<String>,
    Form(form): Form<MemoForm>,
) -> Result<Success<MemoResponse>, Error> {
    let memo = database
        .update_memo(
            &current_user,
            &memo_id,
            &UpdateMemoValues {
                title: form.title.as_deref(),
                content: form.content.as_deref(),
            },
        )
        .await
        .map_err(Error::database)?
        .ok_or_else(|| Error::not_found("Memo not found"))?;

    Ok(Success::ok(MemoResponse::from_memo(memo)))
}

pub async fn delete(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(memo_id): PathParameters<String>,
) -> Result<Success<Message>, Error> {
    let deleted = database
        .delete_memo(&current_user, &memo_id)
        .await
        .map_err(Error::database)?;

    if !deleted {
        return Err(Error::not_found("Memo not found"));
    }

    Ok(Success::message("Memo deleted"))
}
