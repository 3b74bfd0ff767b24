pub mod feed;
pub mod header;
pub mod loading;
pub mod pagination;
pub mod patient_card;
pub mod profile_tab;
pub mod record_lists;
pub mod record_modal;
pub mod search_box;
pub mod search_dialog;
pub mod search_results;
