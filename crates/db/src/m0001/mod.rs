mod consumption_entry;
mod stash_alert;
mod stash_item;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "cannabot",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        stash_item::CreateTable,
        stash_item::CreateUk1,
        consumption_entry::CreateTable,
        consumption_entry::CreateIdx1,
        stash_alert::CreateTable
    ]
);
