mod budgets;
mod cascade;
mod invalid_json;
mod memos;
mod ownership;
mod place_search;
mod token_expiry;
