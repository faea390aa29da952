//! Form types

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::users::User;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The username
    pub username: &'a str,

    /// The email address
    pub email: &'a str,

    /// The hashed password
    pub password_hash: &'a str,
}

/// Values to update a User
pub struct UpdateUserValues<'a> {
    pub username: &'a str,
    pub email: &'a str,

    /// New hashed password, the current one is kept when absent
    pub password_hash: Option<&'a str>,
}

/// Values to create a POI
pub struct CreatePoiValues<'a> {
    /// The owner of the POI
    pub user: &'a User,

    pub id: &'a str,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub location: Option<&'a str>,
    pub tel: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub typecode: Option<&'a str>,
}

/// Values to update a POI, absent fields are left untouched
pub struct UpdatePoiValues<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub location: Option<&'a str>,
    pub tel: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub typecode: Option<&'a str>,
}

/// Values to write an Itinerary, used for both create and update
pub struct ItineraryValues<'a> {
    /// The owner of the itinerary
    pub user: &'a User,

    pub id: &'a str,
    pub name: &'a str,
    pub date: Option<NaiveDate>,
    pub description: Option<&'a str>,

    /// Replaces all existing stops, in this order
    pub stops: &'a [StopValues],
}

/// Values of a single stop, including the POI it is upserted from
pub struct StopValues {
    pub poi_id: String,
    pub poi_name: String,
    pub poi_address: Option<String>,
    pub poi_location: Option<String>,
    pub poi_tel: Option<String>,
    pub poi_type: Option<String>,
    pub poi_typecode: Option<String>,

    pub description: Option<String>,
    pub budget: Decimal,
    pub transport_type: Option<String>,
    pub transport_description: Option<String>,
    pub transport_budget: Decimal,
}

/// Values to create a Budget
pub struct CreateBudgetValues<'a> {
    /// The owner of the budget
    pub user: &'a User,

    pub id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub amount: Decimal,
    pub actual_amount: Decimal,
    pub category: &'a str,
}

/// Values to update a Budget, absent fields are left untouched
pub struct UpdateBudgetValues<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub actual_amount: Option<Decimal>,
    pub category: Option<&'a str>,
}

/// Values to create a Memo
pub struct CreateMemoValues<'a> {
    /// The owner of the memo
    pub user: &'a User,

    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
}

/// Values to update a Memo, absent fields are left untouched
pub struct UpdateMemoValues<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
}
